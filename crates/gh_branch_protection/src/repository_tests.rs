use super::*;
use serial_test::serial;
use tempfile::TempDir;

fn init_repo_with_remotes(remotes: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let repo = Repository::init(temp_dir.path()).expect("Failed to init repository");
    for (name, url) in remotes {
        repo.remote(name, url).expect("Failed to add remote");
    }
    temp_dir
}

#[test]
fn test_parse_repo_arg_owner_and_name() {
    let repo = parse_repo_arg("octo/hello", "github.com").unwrap();

    assert_eq!(repo, RepositoryRef::new("github.com", "octo", "hello"));
}

#[test]
fn test_parse_repo_arg_uses_default_host() {
    let repo = parse_repo_arg("octo/hello", "ghe.example.com").unwrap();

    assert_eq!(repo.host, "ghe.example.com");
}

#[test]
fn test_parse_repo_arg_with_host() {
    let repo = parse_repo_arg("GHE.example.com/octo/hello", "github.com").unwrap();

    assert_eq!(repo, RepositoryRef::new("ghe.example.com", "octo", "hello"));
}

#[test]
fn test_parse_repo_arg_with_url() {
    let repo = parse_repo_arg("https://github.com/octo/hello.git", "ghe.example.com").unwrap();

    assert_eq!(repo, RepositoryRef::new("github.com", "octo", "hello"));
}

#[test]
fn test_parse_repo_arg_rejects_bad_shapes() {
    for value in ["hello", "a/b/c/d", "/hello", "octo/", ""] {
        let result = parse_repo_arg(value, "github.com");

        assert!(
            matches!(result, Err(Error::Repository(_))),
            "expected an error for {value:?}"
        );
    }
}

#[test]
fn test_parse_remote_url_variants() {
    let cases = [
        ("https://github.com/octo/hello.git", "github.com"),
        ("https://github.com/octo/hello", "github.com"),
        ("http://ghe.example.com/octo/hello", "ghe.example.com"),
        ("ssh://git@github.com/octo/hello.git", "github.com"),
        ("ssh://git@ssh.github.com:443/octo/hello.git", "github.com"),
        ("git://github.com/octo/hello.git", "github.com"),
        ("git@github.com:octo/hello.git", "github.com"),
        ("git@ghe.example.com:octo/hello", "ghe.example.com"),
        ("ghe.example.com:octo/hello.git", "ghe.example.com"),
    ];

    for (remote_url, host) in cases {
        let repo = parse_remote_url(remote_url).unwrap_or_else(|e| panic!("{remote_url}: {e}"));

        assert_eq!(repo, RepositoryRef::new(host, "octo", "hello"), "{remote_url}");
    }
}

#[test]
fn test_parse_remote_url_rejects_unsupported() {
    for remote_url in [
        "file:///tmp/octo/hello.git",
        "https://github.com/octo",
        "https://github.com/octo/hello/extra",
        "/tmp/octo/hello",
    ] {
        assert!(
            parse_remote_url(remote_url).is_err(),
            "expected an error for {remote_url}"
        );
    }
}

#[test]
fn test_discover_prefers_upstream() {
    let temp_dir = init_repo_with_remotes(&[
        ("origin", "git@github.com:fork/hello.git"),
        ("upstream", "https://github.com/octo/hello.git"),
        ("another", "https://github.com/other/hello.git"),
    ]);

    let repo = discover_repository(temp_dir.path()).unwrap();

    assert_eq!(repo, RepositoryRef::new("github.com", "octo", "hello"));
}

#[test]
fn test_discover_uses_origin() {
    let temp_dir = init_repo_with_remotes(&[
        ("another", "https://github.com/other/hello.git"),
        ("origin", "git@github.com:octo/hello.git"),
    ]);

    let repo = discover_repository(temp_dir.path()).unwrap();

    assert_eq!(repo.owner, "octo");
}

#[test]
fn test_discover_from_subdirectory() {
    let temp_dir = init_repo_with_remotes(&[("origin", "https://github.com/octo/hello")]);
    let nested = temp_dir.path().join("src").join("deep");
    std::fs::create_dir_all(&nested).expect("Failed to create directory");

    let repo = discover_repository(&nested).unwrap();

    assert_eq!(repo.name, "hello");
}

#[test]
fn test_discover_skips_unparseable_remotes() {
    let temp_dir = init_repo_with_remotes(&[
        ("upstream", "/srv/git/hello.git"),
        ("origin", "https://github.com/octo/hello.git"),
    ]);

    let repo = discover_repository(temp_dir.path()).unwrap();

    assert_eq!(repo.owner, "octo");
}

#[test]
fn test_discover_without_remotes() {
    let temp_dir = init_repo_with_remotes(&[]);

    let result = discover_repository(temp_dir.path());

    match result {
        Err(Error::Repository(msg)) => assert!(msg.contains("no git remotes")),
        other => panic!("Expected Repository error, got {other:?}"),
    }
}

#[test]
fn test_discover_outside_repository() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let result = discover_repository(temp_dir.path());

    assert!(matches!(result, Err(Error::Repository(_))));
}

#[test]
fn test_remote_rank_order() {
    let mut names = vec!["zeta", "origin", "alpha", "github", "upstream"];
    names.sort_by_key(|name| remote_rank(name));

    assert_eq!(names, vec!["upstream", "github", "origin", "alpha", "zeta"]);
}

#[test]
#[serial]
fn test_default_host_from_environment() {
    unsafe {
        std::env::set_var("GH_HOST", "GHE.example.com");
    }
    assert_eq!(default_host(), "ghe.example.com");
    unsafe {
        std::env::remove_var("GH_HOST");
    }
    assert_eq!(default_host(), "github.com");
}
