use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Json as RequestJson,
};

use crate::api::{ErrorResponse, MessageResponse};
use crate::vcs::model::{
    BranchListResponse, BranchQuery, CheckoutQuery, CommitListResponse, DefaultBranchQuery,
    DiffQuery, DiffResponse, FileContentResponse, FileDelete, FileListResponse, FileWrite,
    MergeRequest, MergeResponse, NewBranch, RepoListResponse,
};
use crate::vcs::repo::{GitBackend, MergeOutcome, VcsError};

#[derive(Clone)]
pub struct VcsState {
    pub backend: GitBackend,
}

fn error_response(e: VcsError) -> (StatusCode, Json<ErrorResponse>) {
    let status = if e.is_not_found() {
        StatusCode::NOT_FOUND
    } else if e.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(ErrorResponse::new(&e.to_string())))
}

/// Run a git2 operation on the blocking pool; the library is synchronous.
async fn run_git<T, F>(task: F) -> Result<T, (StatusCode, Json<ErrorResponse>)>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, VcsError> + Send + 'static,
{
    match tokio::task::spawn_blocking(task).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            if !e.is_not_found() && !e.is_client_error() {
                log::error!("git operation failed: {}", e);
            }
            Err(error_response(e))
        }
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&format!("Internal task failure: {}", e))),
        )),
    }
}

pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new(
        "Version Control Microservice is running",
    ))
}

pub async fn list_repositories(
    State(state): State<VcsState>,
) -> Result<Json<RepoListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let backend = state.backend.clone();
    let repositories = run_git(move || backend.list_repos()).await?;
    Ok(Json(RepoListResponse { repositories }))
}

pub async fn create_repository(
    State(state): State<VcsState>,
    Path(repo_name): Path<String>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    let backend = state.backend.clone();
    let name = repo_name.clone();
    run_git(move || backend.create_repo(&name)).await?;
    Ok(Json(MessageResponse::new(format!(
        "Repository '{}' created successfully",
        repo_name
    ))))
}

pub async fn delete_repository(
    State(state): State<VcsState>,
    Path(repo_name): Path<String>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    let backend = state.backend.clone();
    let name = repo_name.clone();
    run_git(move || backend.delete_repo(&name)).await?;
    Ok(Json(MessageResponse::new(format!(
        "Repository '{}' deleted successfully",
        repo_name
    ))))
}

pub async fn list_branches(
    State(state): State<VcsState>,
    Path(repo_name): Path<String>,
) -> Result<Json<BranchListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let backend = state.backend.clone();
    let branches = run_git(move || backend.list_branches(&repo_name)).await?;
    Ok(Json(BranchListResponse { branches }))
}

pub async fn create_branch(
    State(state): State<VcsState>,
    Path(repo_name): Path<String>,
    RequestJson(branch): RequestJson<NewBranch>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    let backend = state.backend.clone();
    let name = branch.name.clone();
    run_git(move || backend.create_branch(&repo_name, &branch.name, &branch.source_branch))
        .await?;
    Ok(Json(MessageResponse::new(format!(
        "Branch '{}' created successfully",
        name
    ))))
}

pub async fn list_commits(
    State(state): State<VcsState>,
    Path(repo_name): Path<String>,
    Query(query): Query<BranchQuery>,
) -> Result<Json<CommitListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let backend = state.backend.clone();
    let commits =
        run_git(move || backend.list_commits(&repo_name, query.branch.as_deref())).await?;
    Ok(Json(CommitListResponse { commits }))
}

pub async fn list_files(
    State(state): State<VcsState>,
    Path(repo_name): Path<String>,
    Query(query): Query<DefaultBranchQuery>,
) -> Result<Json<FileListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let backend = state.backend.clone();
    let files = run_git(move || backend.list_files(&repo_name, &query.branch)).await?;
    Ok(Json(FileListResponse { files }))
}

pub async fn get_file_content(
    State(state): State<VcsState>,
    Path((repo_name, file_path)): Path<(String, String)>,
    Query(query): Query<DefaultBranchQuery>,
) -> Result<Json<FileContentResponse>, (StatusCode, Json<ErrorResponse>)> {
    let backend = state.backend.clone();
    let content =
        run_git(move || backend.read_file(&repo_name, &query.branch, &file_path)).await?;
    Ok(Json(FileContentResponse { content }))
}

pub async fn update_file(
    State(state): State<VcsState>,
    Path((repo_name, file_path)): Path<(String, String)>,
    Query(query): Query<DefaultBranchQuery>,
    RequestJson(file): RequestJson<FileWrite>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    let backend = state.backend.clone();
    let path = file_path.clone();
    run_git(move || {
        backend.write_file(
            &repo_name,
            &query.branch,
            &file_path,
            &file.content,
            &file.commit_message,
            &file.author_name,
            &file.author_email,
        )
    })
    .await?;
    Ok(Json(MessageResponse::new(format!(
        "File '{}' updated and committed successfully",
        path
    ))))
}

pub async fn delete_file(
    State(state): State<VcsState>,
    Path((repo_name, file_path)): Path<(String, String)>,
    Query(query): Query<DefaultBranchQuery>,
    RequestJson(file): RequestJson<FileDelete>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    let backend = state.backend.clone();
    let path = file_path.clone();
    run_git(move || {
        backend.delete_file(
            &repo_name,
            &query.branch,
            &file_path,
            &file.commit_message,
            &file.author_name,
            &file.author_email,
        )
    })
    .await?;
    Ok(Json(MessageResponse::new(format!(
        "File '{}' deleted and committed successfully",
        path
    ))))
}

pub async fn checkout_branch(
    State(state): State<VcsState>,
    Path(repo_name): Path<String>,
    Query(query): Query<CheckoutQuery>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    let backend = state.backend.clone();
    let branch = query.branch.clone();
    run_git(move || backend.checkout(&repo_name, &query.branch)).await?;
    Ok(Json(MessageResponse::new(format!(
        "Checked out branch '{}' successfully",
        branch
    ))))
}

pub async fn get_diff(
    State(state): State<VcsState>,
    Path(repo_name): Path<String>,
    Query(query): Query<DiffQuery>,
) -> Result<Json<DiffResponse>, (StatusCode, Json<ErrorResponse>)> {
    let backend = state.backend.clone();
    let diff =
        run_git(move || backend.diff(&repo_name, &query.commit1, query.commit2.as_deref()))
            .await?;

    Ok(Json(DiffResponse {
        diff: diff
            .unwrap_or_else(|| "This is the first commit, no diff available".to_string()),
    }))
}

pub async fn merge_branches(
    State(state): State<VcsState>,
    Path(repo_name): Path<String>,
    RequestJson(request): RequestJson<MergeRequest>,
) -> Result<Json<MergeResponse>, (StatusCode, Json<ErrorResponse>)> {
    let backend = state.backend.clone();
    let source = request.source_branch.clone();
    let target = request.target_branch.clone();

    let outcome = run_git(move || {
        backend.merge(
            &repo_name,
            &request.source_branch,
            &request.target_branch,
            &request.commit_message,
            &request.author_name,
            &request.author_email,
        )
    })
    .await?;

    let response = match outcome {
        MergeOutcome::Conflict => MergeResponse {
            message: "Merge conflict detected. Merge aborted.".to_string(),
            status: Some("conflict".to_string()),
        },
        MergeOutcome::Merged | MergeOutcome::FastForward | MergeOutcome::UpToDate => {
            MergeResponse {
                message: format!("Merged '{}' into '{}' successfully", source, target),
                status: None,
            }
        }
    };

    Ok(Json(response))
}
