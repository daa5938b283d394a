use anyhow::Result;
use cchistory::adapters::codecommit::HttpCodeCommit;
use cchistory::adapters::sigv4::Credentials;
use cchistory::app::{execute, Outcome};
use cchistory::cli::CliArgs;
use cchistory::config::Environment;
use cchistory_core::ports::{CodeCommitApi, ListRepositoriesRequest};
use cchistory_core::{CommitId, CoreError};
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::json;
use tempfile::TempDir;

const JSON: &str = "application/x-amz-json-1.1";

fn target(operation: &str) -> String {
    format!("CodeCommit_20150413.{}", operation)
}

fn mock_op(
    server: &mut ServerGuard,
    operation: &str,
    input: serde_json::Value,
    output: serde_json::Value,
) -> Mock {
    server
        .mock("POST", "/")
        .match_header("x-amz-target", target(operation).as_str())
        .match_body(Matcher::PartialJson(input))
        .with_status(200)
        .with_header("content-type", JSON)
        .with_body(output.to_string())
        .create()
}

fn commit_json(id: &str, parents: &[&str]) -> serde_json::Value {
    json!({
        "commit": {
            "commitId": id,
            "treeId": format!("tree-{}", id),
            "parents": parents,
            "message": format!("commit {}\n", id),
            "author": {"name": "Kellie", "email": "k@example.com", "date": "1484167798 -0800"},
            "committer": {"name": "Kellie", "email": "k@example.com", "date": "1484167798 -0800"},
            "additionalData": ""
        }
    })
}

fn api_for(server: &ServerGuard) -> Result<HttpCodeCommit> {
    HttpCodeCommit::new(
        "us-east-1",
        Some(&server.url()),
        Credentials::new("AKIDEXAMPLE", "secret"),
    )
}

#[test]
fn test_requests_are_signed_json_calls() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/")
        .match_header("content-type", JSON)
        .match_header("x-amz-target", target("GetBranch").as_str())
        .match_header(
            "authorization",
            Matcher::Regex(
                r"^AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/\d{8}/us-east-1/codecommit/aws4_request, SignedHeaders=content-type;host;x-amz-date;x-amz-target, Signature=[0-9a-f]{64}$".to_string(),
            ),
        )
        .match_header("x-amz-date", Matcher::Regex(r"^\d{8}T\d{6}Z$".to_string()))
        .match_body(Matcher::Json(json!({"repositoryName": "kellie1", "branchName": "main"})))
        .with_status(200)
        .with_header("content-type", JSON)
        .with_body(json!({"branch": {"branchName": "main", "commitId": "c3"}}).to_string())
        .create();

    let branch = api_for(&server)?.get_branch("kellie1", "main")?;

    mock.assert();
    assert_eq!(branch.branch_name, "main");
    assert_eq!(branch.commit_id, CommitId::from("c3"));
    Ok(())
}

#[test]
fn test_list_repositories_sends_sort_and_token() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = mock_op(
        &mut server,
        "ListRepositories",
        json!({"sortBy": "lastModifiedDate", "order": "ascending", "nextToken": "page-2"}),
        json!({"repositories": [{"repositoryName": "kellie1", "repositoryId": "id-1"}]}),
    );

    let request =
        ListRepositoriesRequest::by_last_modified().with_token(Some("page-2".to_string()));
    let page = api_for(&server)?.list_repositories(&request)?;

    mock.assert();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].repository_name, "kellie1");
    assert_eq!(page.next_token, None);
    Ok(())
}

#[test]
fn test_service_error_is_decoded() -> Result<()> {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/")
        .match_header("x-amz-target", target("GetCommit").as_str())
        .with_status(400)
        .with_header("content-type", JSON)
        .with_header("x-amzn-errortype", "CommitIdDoesNotExistException:http://internal.amazon.com/coral/com.amazon.codecommit/")
        .with_body(json!({
            "__type": "com.amazonaws.codecommit#CommitIdDoesNotExistException",
            "message": "Could not find commit"
        }).to_string())
        .create();

    let err = api_for(&server)?
        .get_commit("kellie1", &CommitId::from("nope"))
        .unwrap_err();

    match err {
        CoreError::Service { operation, status, code, message } => {
            assert_eq!(operation, "GetCommit");
            assert_eq!(status, Some(400));
            assert_eq!(code, "CommitIdDoesNotExistException");
            assert_eq!(message, "Could not find commit");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    Ok(())
}

#[test]
fn test_missing_commit_field_is_an_error() -> Result<()> {
    let mut server = mockito::Server::new();
    let _mock = mock_op(&mut server, "GetCommit", json!({"commitId": "c1"}), json!({}));

    let err = api_for(&server)?
        .get_commit("kellie1", &CommitId::from("c1"))
        .unwrap_err();

    assert!(matches!(err, CoreError::MissingField { field: "commit", .. }));
    Ok(())
}

#[test]
fn test_execute_walks_every_branch_of_every_repository() -> Result<()> {
    colored::control::set_override(false);
    let mut server = mockito::Server::new();
    let mocks = vec![
        mock_op(
            &mut server,
            "ListRepositories",
            json!({"sortBy": "lastModifiedDate", "order": "ascending"}),
            json!({"repositories": [{"repositoryName": "kellie1", "repositoryId": "id-1"}]}),
        ),
        mock_op(
            &mut server,
            "ListBranches",
            json!({"repositoryName": "kellie1"}),
            json!({"branches": ["main", "dev"]}),
        ),
        mock_op(
            &mut server,
            "GetBranch",
            json!({"branchName": "main"}),
            json!({"branch": {"branchName": "main", "commitId": "c3"}}),
        ),
        mock_op(
            &mut server,
            "GetBranch",
            json!({"branchName": "dev"}),
            json!({"branch": {"branchName": "dev", "commitId": "c4"}}),
        ),
        mock_op(&mut server, "GetCommit", json!({"commitId": "c3"}), commit_json("c3", &["c1"])),
        mock_op(&mut server, "GetCommit", json!({"commitId": "c4"}), commit_json("c4", &["c1"])),
    ];
    let shared_root = server
        .mock("POST", "/")
        .match_header("x-amz-target", target("GetCommit").as_str())
        .match_body(Matcher::PartialJson(json!({"commitId": "c1"})))
        .with_status(200)
        .with_header("content-type", JSON)
        .with_body(commit_json("c1", &[]).to_string())
        .expect(2)
        .create();

    let temp_dir = TempDir::new()?;
    let args = CliArgs {
        config: Some(temp_dir.path().join("cchistory.toml")),
        endpoint: Some(server.url()),
        ..CliArgs::default()
    };
    let env = Environment {
        aws: Credentials::new("AKIDEXAMPLE", "secret"),
        ..Environment::default()
    };

    let mut out = Vec::new();
    let outcome = execute(&args, &env, &mut out)?;

    for mock in &mocks {
        mock.assert();
    }
    shared_root.assert();

    match outcome {
        Outcome::Remote(stats) => {
            assert_eq!(stats.repositories, 1);
            assert_eq!(stats.branches, 2);
            assert_eq!(stats.commits.reported, 4);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    let output = String::from_utf8(out)?;
    let commits: Vec<&str> = output
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with("Commit:"))
        .collect();
    assert_eq!(commits, vec!["Commit: c3", "Commit: c1", "Commit: c4", "Commit: c1"]);
    assert!(output.contains("Author: Kellie, Date: 1484167798 -0800"));
    Ok(())
}

#[test]
fn test_execute_stops_on_first_error() -> Result<()> {
    let mut server = mockito::Server::new();
    let _list = mock_op(
        &mut server,
        "ListRepositories",
        json!({"sortBy": "lastModifiedDate"}),
        json!({"repositories": [{"repositoryName": "kellie1", "repositoryId": "id-1"}]}),
    );
    let _denied = server
        .mock("POST", "/")
        .match_header("x-amz-target", target("ListBranches").as_str())
        .with_status(400)
        .with_body(json!({"__type": "AccessDeniedException", "message": "denied"}).to_string())
        .create();
    let never = server
        .mock("POST", "/")
        .match_header("x-amz-target", target("GetBranch").as_str())
        .expect(0)
        .create();

    let temp_dir = TempDir::new()?;
    let args = CliArgs {
        config: Some(temp_dir.path().join("cchistory.toml")),
        endpoint: Some(server.url()),
        ..CliArgs::default()
    };

    let mut out = Vec::new();
    let err = execute(&args, &Environment::default(), &mut out).unwrap_err();

    never.assert();
    let core = err.downcast_ref::<CoreError>().expect("service error");
    assert!(matches!(core, CoreError::Service { code, .. } if code == "AccessDeniedException"));
    Ok(())
}
