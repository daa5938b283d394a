use anyhow::Context;
use cchistory_core::domain::{Branch, Commit, CommitId, Repository, RepositoryMetadata};
use cchistory_core::error::{CoreError, Result};
use cchistory_core::ports::{CodeCommitApi, ListRepositoriesRequest, Page};
use chrono::Utc;
use reqwest::blocking::Client;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::adapters::sigv4::{self, Credentials, SignableRequest, SigningParams};

const SERVICE: &str = "codecommit";
const TARGET_PREFIX: &str = "CodeCommit_20150413";
const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// Regional API endpoint of the service
pub fn default_endpoint(region: &str) -> String {
    format!("https://codecommit.{}.amazonaws.com", region)
}

/// `CodeCommitApi` over the AWS JSON 1.1 protocol with SigV4-signed requests
pub struct HttpCodeCommit {
    client: Client,
    endpoint: Url,
    region: String,
    credentials: Credentials,
}

impl HttpCodeCommit {
    pub fn new(
        region: &str,
        endpoint: Option<&str>,
        credentials: Credentials,
    ) -> anyhow::Result<Self> {
        let endpoint = match endpoint {
            Some(endpoint) => endpoint.to_string(),
            None => default_endpoint(region),
        };
        let endpoint = Url::parse(&endpoint)
            .with_context(|| format!("Invalid service endpoint: {}", endpoint))?;
        if endpoint.host_str().is_none() {
            anyhow::bail!("Service endpoint has no host: {}", endpoint);
        }

        let client = Client::builder()
            .user_agent(concat!("cchistory/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            region: region.to_string(),
            credentials,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn host_header(&self) -> String {
        let host = self.endpoint.host_str().unwrap_or_default();
        match self.endpoint.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }

    /// Send one signed operation and decode its output
    fn call<I: Serialize, O: DeserializeOwned>(
        &self,
        operation: &'static str,
        input: &I,
    ) -> Result<O> {
        let body = serde_json::to_vec(input).map_err(|err| CoreError::Decode {
            operation,
            detail: format!("could not encode request: {}", err),
        })?;
        let target = format!("{}.{}", TARGET_PREFIX, operation);

        let headers = vec![
            ("content-type".to_string(), CONTENT_TYPE.to_string()),
            ("host".to_string(), self.host_header()),
            ("x-amz-target".to_string(), target),
        ];
        let signable = SignableRequest {
            method: "POST",
            path: self.endpoint.path(),
            query: self.endpoint.query().unwrap_or(""),
            headers: headers.clone(),
            body: &body,
        };
        let signed = sigv4::sign(
            &signable,
            &SigningParams {
                credentials: &self.credentials,
                region: &self.region,
                service: SERVICE,
                time: Utc::now(),
            },
        );

        debug!(operation, endpoint = %self.endpoint, "sending request");
        let mut request = self.client.post(self.endpoint.clone()).body(body);
        for (name, value) in headers.iter().chain(signed.iter()) {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().map_err(|err| CoreError::Transport {
            operation,
            source: err.into(),
        })?;
        let status = response.status();
        let error_type = response
            .headers()
            .get("x-amzn-errortype")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = response.text().map_err(|err| CoreError::Transport {
            operation,
            source: err.into(),
        })?;

        if !status.is_success() {
            let err = service_error(operation, status.as_u16(), error_type.as_deref(), &text);
            warn!(operation, status = status.as_u16(), "service returned an error");
            return Err(err);
        }

        serde_json::from_str(&text).map_err(|err| {
            debug!(operation, body = %text, "could not decode response");
            CoreError::Decode {
                operation,
                detail: err.to_string(),
            }
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct ServiceErrorBody {
    #[serde(rename = "__type", default)]
    error_type: Option<String>,
    #[serde(alias = "Message", default)]
    message: Option<String>,
}

/// Build a typed error from a non-2xx response.
///
/// The code comes from `x-amzn-ErrorType` when present, else from `__type`;
/// both may carry a namespace (`ns#Code`) or a suffix (`Code:http://...`).
fn service_error(
    operation: &'static str,
    status: u16,
    header_type: Option<&str>,
    body: &str,
) -> CoreError {
    let parsed: ServiceErrorBody = serde_json::from_str(body).unwrap_or_default();
    let raw_code = header_type
        .map(str::to_string)
        .or(parsed.error_type)
        .unwrap_or_else(|| format!("HTTP {}", status));
    let code = raw_code
        .rsplit('#')
        .next()
        .and_then(|c| c.split(':').next())
        .unwrap_or(raw_code.as_str())
        .to_string();
    let message = parsed
        .message
        .unwrap_or_else(|| body.trim().to_string());

    CoreError::Service {
        operation,
        status: Some(status),
        code,
        message,
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListRepositoriesOutput {
    #[serde(default)]
    repositories: Vec<Repository>,
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetRepositoryOutput {
    repository_metadata: Option<RepositoryMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListBranchesOutput {
    #[serde(default)]
    branches: Vec<String>,
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BranchInfo {
    branch_name: Option<String>,
    commit_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GetBranchOutput {
    branch: Option<BranchInfo>,
}

#[derive(Debug, Deserialize)]
struct GetCommitOutput {
    commit: Option<Commit>,
}

impl CodeCommitApi for HttpCodeCommit {
    fn list_repositories(&self, request: &ListRepositoriesRequest) -> Result<Page<Repository>> {
        let output: ListRepositoriesOutput = self.call("ListRepositories", request)?;
        Ok(Page {
            items: output.repositories,
            next_token: output.next_token,
        })
    }

    fn get_repository(&self, repository_name: &str) -> Result<RepositoryMetadata> {
        let output: GetRepositoryOutput =
            self.call("GetRepository", &json!({ "repositoryName": repository_name }))?;
        output.repository_metadata.ok_or(CoreError::MissingField {
            operation: "GetRepository",
            field: "repositoryMetadata",
        })
    }

    fn list_branches(
        &self,
        repository_name: &str,
        next_token: Option<&str>,
    ) -> Result<Page<String>> {
        let mut input = json!({ "repositoryName": repository_name });
        if let Some(token) = next_token {
            input["nextToken"] = json!(token);
        }
        let output: ListBranchesOutput = self.call("ListBranches", &input)?;
        Ok(Page {
            items: output.branches,
            next_token: output.next_token,
        })
    }

    fn get_branch(&self, repository_name: &str, branch_name: &str) -> Result<Branch> {
        let output: GetBranchOutput = self.call(
            "GetBranch",
            &json!({ "repositoryName": repository_name, "branchName": branch_name }),
        )?;
        let info = output.branch.ok_or(CoreError::MissingField {
            operation: "GetBranch",
            field: "branch",
        })?;
        let commit_id = info.commit_id.ok_or(CoreError::MissingField {
            operation: "GetBranch",
            field: "branch.commitId",
        })?;
        Ok(Branch::new(
            info.branch_name.unwrap_or_else(|| branch_name.to_string()),
            commit_id,
        ))
    }

    fn get_commit(&self, repository_name: &str, commit_id: &CommitId) -> Result<Commit> {
        let output: GetCommitOutput = self.call(
            "GetCommit",
            &json!({ "repositoryName": repository_name, "commitId": commit_id }),
        )?;
        output.commit.ok_or(CoreError::MissingField {
            operation: "GetCommit",
            field: "commit",
        })
    }
}
