use form_roster::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn notification(subject: &str, reply_to: &str, date: &str, values: &[&str]) -> String {
    let labels = [
        "Name", "Email", "Category", "Pronouns", "Message", "City/Team", "Field 6", "Field 7",
        "Field 8",
    ];
    let rows: String = values
        .iter()
        .zip(labels)
        .map(|(value, label)| format!("<p><b>{label}:</b> <span>{value}</span></p>\r\n"))
        .collect();

    format!(
        "From: Forms <forms@example.com>\r\n\
         Reply-To: {reply_to}\r\n\
         Subject: {subject}\r\n\
         Date: {date}\r\n\
         MIME-Version: 1.0\r\n\
         Content-Type: text/html; charset=utf-8\r\n\
         \r\n\
         <html><body>\r\n{rows}<p>Sent via form submission from Example Races</p>\r\n\
         <p><b>Footer:</b> <span>ignored</span></p></body></html>\r\n"
    )
}

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

fn config(input: &TempDir, output: &TempDir) -> Config {
    Config {
        input_dir: input.path().to_path_buf(),
        output_dir: output.path().join("out"),
        event: "test24".to_string(),
        ..Config::default()
    }
}

#[test]
fn test_volunteer_without_travel() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(
        input.path(),
        "a.eml",
        &notification(
            "New submission from Form 2",
            "jane@example.com",
            "Fri, 01 Mar 2024 12:00:00 +0000",
            &["Jane Doe", "", "Runner", "she/her", "Hi there", "Metro TC"],
        ),
    );

    let roster = build_roster(&config(&input, &output)).unwrap();
    assert!(roster.participants.is_empty());
    assert_eq!(roster.volunteers.len(), 1);

    let v = &roster.volunteers[0];
    assert_eq!(v.name, "Jane Doe");
    assert_eq!(v.email, "jane@example.com");
    assert_eq!(v.category, "Runner");
    assert_eq!(v.pronouns, "she/her");
    assert_eq!(v.message, "Hi there");
    assert_eq!(v.affiliation, "Metro TC");
    assert_eq!(v.race_number, "");
    assert_eq!(v.arrival, "");
    assert_eq!(v.departure, "");
}

#[test]
fn test_participant_with_travel() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(
        input.path(),
        "b.eml",
        &notification(
            "New submission from Registration",
            "Sam <sam@example.com>",
            "Fri, 01 Mar 2024 12:00:00 +0000",
            &[
                "Sam Lee", "sam@example.com", "Messenger", "he/him", "Caf=C3=A9 stop?", "Berlin",
                "42", "Thu 18:00", "Mon 09:15",
            ],
        ),
    );

    let roster = build_roster(&config(&input, &output)).unwrap();
    let p = &roster.participants[0];
    assert_eq!(p.kind, SubmissionKind::Participant);
    assert_eq!(p.email, "sam@example.com");
    assert_eq!(p.message, "Café stop?");
    assert_eq!(p.race_number, "42");
    assert_eq!(p.arrival, "Thu 18:00");
    assert_eq!(p.departure, "Mon 09:15");
}

#[test]
fn test_literal_equals_sign_builds_record() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(
        input.path(),
        "a.eml",
        &notification(
            "New submission from Registration",
            "kim@example.com",
            "Fri, 01 Mar 2024 12:00:00 +0000",
            &["Kim", "", "Messenger", "they", "Bike = fixie", "Leipzig", "7"],
        ),
    );

    let roster = build_roster(&config(&input, &output)).unwrap();
    assert_eq!(roster.participants.len(), 1);
    assert_eq!(roster.participants[0].message, "Bike = fixie");
    assert_eq!(roster.participants[0].race_number, "7");
}

#[test]
fn test_empty_input_dir_gives_empty_roster() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    let roster = build_roster(&config(&input, &output)).unwrap();
    assert!(roster.is_empty());
    assert_eq!(roster.len(), 0);
}

#[test]
fn test_short_message_aborts_with_file_name() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(
        input.path(),
        "short.eml",
        &notification(
            "New submission",
            "x@example.com",
            "Fri, 01 Mar 2024 12:00:00 +0000",
            &["Only", "", "Three"],
        ),
    );

    let err = build_roster(&config(&input, &output)).unwrap_err();
    assert!(matches!(err, RosterError::Shape { .. }));
    let text = err.to_string();
    assert!(text.contains("short.eml"), "{text}");
    assert!(text.contains("pronouns"), "{text}");
}

#[test]
fn test_malformed_envelope_aborts() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(input.path(), "broken.eml", "this is not an email\r\n\r\nbody");

    let err = build_roster(&config(&input, &output)).unwrap_err();
    assert!(matches!(err, RosterError::Message { .. }));
    assert!(err.to_string().contains("broken.eml"));
}

#[test]
fn test_missing_input_dir() {
    let output = TempDir::new().unwrap();
    let config = Config {
        input_dir: output.path().join("does-not-exist"),
        ..Config::default()
    };

    assert!(matches!(
        build_roster(&config),
        Err(RosterError::InputDir { .. })
    ));
}

#[test]
fn test_skips_directories_and_messages_without_html() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    fs::create_dir(input.path().join("nested")).unwrap();
    write(
        input.path(),
        "plain.eml",
        "Reply-To: a@example.com\r\n\
         Subject: New submission\r\n\
         Date: Fri, 01 Mar 2024 12:00:00 +0000\r\n\
         \r\n\
         no html here",
    );
    write(
        input.path(),
        "ok.eml",
        &notification(
            "New submission",
            "b@example.com",
            "Fri, 01 Mar 2024 12:00:00 +0000",
            &["B", "", "Runner", "they", "Hi", "Team", "5"],
        ),
    );

    let roster = build_roster(&config(&input, &output)).unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster.participants[0].race_number, "5");
}

#[test]
fn test_run_writes_all_exports() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(
        input.path(),
        "1.eml",
        &notification(
            "New submission",
            "late@example.com",
            "Sat, 02 Mar 2024 08:00:00 +0000",
            &["Late", "", "Runner", "she/her", "Hi", "Team A", "20"],
        ),
    );
    write(
        input.path(),
        "2.eml",
        &notification(
            "New submission",
            "early@example.com",
            "Fri, 01 Mar 2024 08:00:00 -0500",
            &["Early", "", "Runner", "he/him", "Hello, all", "Team B", "3"],
        ),
    );
    write(
        input.path(),
        "3.eml",
        &notification(
            "Form 2 submission",
            "early@example.com",
            "Fri, 01 Mar 2024 09:00:00 +0000",
            &["Early", "", "Marshal", "he/him", "Happy to help", "Team B"],
        ),
    );

    let config = config(&input, &output);
    let summary = run(&config).unwrap();
    assert_eq!(summary.participants, 2);
    assert_eq!(summary.volunteers, 1);
    assert_eq!(summary.race_numbers, vec!["3", "20"]);

    let participants = fs::read_to_string(config.participants_csv()).unwrap();
    let lines: Vec<&str> = participants.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], PARTICIPANT_HEADER.join(","));
    assert!(lines[1].starts_with("Early,early@example.com,"));
    assert!(lines[1].contains("2024-03-01 13:00:00 +0000 UTC"));
    assert!(lines[2].starts_with("Late,late@example.com,"));

    let volunteers = fs::read_to_string(config.volunteers_csv()).unwrap();
    assert_eq!(volunteers.lines().count(), 2);
    assert_eq!(volunteers.lines().next().unwrap(), VOLUNTEER_HEADER.join(","));

    assert_eq!(
        fs::read_to_string(config.volunteer_emails()).unwrap(),
        "early@example.com"
    );
    assert_eq!(
        fs::read_to_string(config.participant_emails()).unwrap(),
        "early@example.com,late@example.com"
    );
    assert_eq!(
        fs::read_to_string(config.all_emails()).unwrap(),
        "early@example.com,late@example.com"
    );
}

#[test]
fn test_run_overwrites_previous_output() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let config = config(&input, &output);
    fs::create_dir_all(&config.output_dir).unwrap();
    fs::write(config.all_emails(), "stale@example.com,another@example.com").unwrap();

    let summary = run(&config).unwrap();
    assert_eq!(summary.participants, 0);
    assert_eq!(fs::read_to_string(config.all_emails()).unwrap(), "");
    assert_eq!(
        fs::read_to_string(config.participants_csv()).unwrap().trim_end(),
        PARTICIPANT_HEADER.join(",")
    );
}
