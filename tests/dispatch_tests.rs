use std::fs;

use linksift::dispatch::{build_safe_command, build_shell_command, Dispatcher, HandlerMode};

#[test]
fn safe_dispatch_delivers_hostile_urls_as_inert_arguments() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("injected");
    let hostile = format!("http://x.example/; touch {}", marker.display());

    // `true` swallows its arguments; only a shell could act on the `;`.
    let dispatcher = Dispatcher::new(None, Some("true {}".to_string()), false);
    dispatcher
        .dispatch(HandlerMode::Command, &hostile)
        .unwrap();

    assert!(
        !marker.exists(),
        "safe mode must never hand the URL to a shell"
    );
}

#[test]
fn shell_dispatch_does_interpret_the_template() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("ran");
    let template = format!("touch {}", out.display());

    // No `{}` in the template plus --pipe: the URL arrives on stdin and the
    // template runs as the user wrote it, shell and all.
    let dispatcher = Dispatcher::new(Some(template), None, true);
    dispatcher
        .dispatch(HandlerMode::Command, "http://x.example")
        .unwrap();

    assert!(out.exists());
}

#[test]
fn safe_pipe_mode_feeds_the_url_to_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("captured");
    // `tee` copies stdin to the file without any shell involvement.
    let template = format!("tee {}", out.display());

    let dispatcher = Dispatcher::new(None, Some(template), true);
    dispatcher
        .dispatch(HandlerMode::Command, "http://pipe.example")
        .unwrap();

    assert_eq!(fs::read_to_string(&out).unwrap(), "http://pipe.example");
}

#[test]
fn failures_are_reported_not_fatal() {
    let failing = Dispatcher::new(None, Some("false".to_string()), false);
    let err = failing
        .dispatch(HandlerMode::Command, "http://x.example")
        .unwrap_err();
    assert!(err.to_string().contains("dispatch failed"));

    let missing = Dispatcher::new(None, Some("linksift-no-such-program {}".to_string()), false);
    assert!(missing
        .dispatch(HandlerMode::Command, "http://x.example")
        .is_err());
}

#[test]
fn command_templates_build_the_expected_argv() {
    let url = "http://x.example/a b;&|$(boom)";
    let safe = build_safe_command("opener --tab {}", url, false).unwrap();
    assert_eq!(safe.get_program().to_string_lossy(), "opener");
    let args: Vec<String> = safe
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    assert_eq!(args, vec!["--tab".to_string(), url.to_string()]);

    let shell = build_shell_command("echo {} | xclip", "http://x.example", false);
    assert_eq!(shell.get_program().to_string_lossy(), "sh");
    let args: Vec<String> = shell
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    assert_eq!(args, vec!["-c".to_string(), "echo http://x.example | xclip".to_string()]);
}
