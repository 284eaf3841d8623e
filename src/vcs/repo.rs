use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};
use git2::build::{CheckoutBuilder, TreeUpdateBuilder};
use git2::{
    BranchType, DiffFormat, FileMode, ObjectType, Repository, RepositoryInitOptions, ResetType,
    Signature, Sort, TreeWalkMode, TreeWalkResult,
};

use crate::vcs::model::{CommitAuthor, CommitEntry, CommitStats};

pub const DEFAULT_BRANCH: &str = "main";

const SERVICE_AUTHOR: &str = "Version Control Service";
const SERVICE_EMAIL: &str = "service@example.com";

#[derive(Debug, thiserror::Error)]
pub enum VcsError {
    #[error("Repository '{0}' not found")]
    RepoNotFound(String),
    #[error("Repository '{0}' already exists")]
    RepoExists(String),
    #[error("'{0}' is not a valid Git repository")]
    InvalidRepo(String),
    #[error("'{0}' is not a valid repository name")]
    InvalidName(String),
    #[error("Branch '{0}' not found")]
    BranchNotFound(String),
    #[error("Branch '{0}' already exists")]
    BranchExists(String),
    #[error("File '{0}' not found")]
    FileNotFound(String),
    #[error("'{0}' is not a valid file path")]
    InvalidPath(String),
    #[error("Commit not found")]
    CommitNotFound,
    #[error(transparent)]
    Git(#[from] git2::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl VcsError {
    /// Whether the error names something the caller asked for that is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            VcsError::RepoNotFound(_)
                | VcsError::BranchNotFound(_)
                | VcsError::FileNotFound(_)
                | VcsError::CommitNotFound
        )
    }

    /// Whether the error is the caller's fault rather than the service's.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            VcsError::RepoExists(_)
                | VcsError::BranchExists(_)
                | VcsError::InvalidRepo(_)
                | VcsError::InvalidName(_)
                | VcsError::InvalidPath(_)
        )
    }
}

/// Outcome of a merge request. Conflicts abort the merge and leave the
/// repository as it was.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeOutcome {
    Merged,
    FastForward,
    UpToDate,
    Conflict,
}

/// Facade over the git2 library, one directory per repository.
///
/// All methods are synchronous; callers on the async runtime go through
/// `spawn_blocking`.
#[derive(Debug, Clone)]
pub struct GitBackend {
    repos_dir: PathBuf,
}

impl GitBackend {
    pub fn new(repos_dir: PathBuf) -> Self {
        Self { repos_dir }
    }

    pub fn repos_dir(&self) -> &Path {
        &self.repos_dir
    }

    fn repo_path(&self, name: &str) -> Result<PathBuf, VcsError> {
        // Repository names are single path segments; anything else could
        // escape the repos directory.
        if name.is_empty()
            || name.starts_with('.')
            || name.contains('/')
            || name.contains('\\')
        {
            return Err(VcsError::InvalidName(name.to_string()));
        }
        Ok(self.repos_dir.join(name))
    }

    fn open(&self, name: &str) -> Result<Repository, VcsError> {
        let path = self.repo_path(name)?;
        if !path.is_dir() {
            return Err(VcsError::RepoNotFound(name.to_string()));
        }
        Repository::open(&path).map_err(|_| VcsError::InvalidRepo(name.to_string()))
    }

    /// List directories under the repos root that hold a Git repository.
    pub fn list_repos(&self) -> Result<Vec<String>, VcsError> {
        if !self.repos_dir.exists() {
            return Ok(Vec::new());
        }

        let mut repos = Vec::new();
        for entry in std::fs::read_dir(&self.repos_dir)? {
            let entry = entry?;
            if entry.path().is_dir() && entry.path().join(".git").exists() {
                repos.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        repos.sort();
        Ok(repos)
    }

    /// Initialize a repository with a seeded README on the default branch.
    pub fn create_repo(&self, name: &str) -> Result<(), VcsError> {
        let path = self.repo_path(name)?;
        if path.exists() {
            return Err(VcsError::RepoExists(name.to_string()));
        }

        match self.init_repo(name, &path) {
            Ok(()) => Ok(()),
            Err(e) => {
                // Leave no half-initialized directory behind.
                if path.exists() {
                    let _ = std::fs::remove_dir_all(&path);
                }
                Err(e)
            }
        }
    }

    fn init_repo(&self, name: &str, path: &Path) -> Result<(), VcsError> {
        let mut options = RepositoryInitOptions::new();
        options.initial_head(DEFAULT_BRANCH);
        let repo = Repository::init_opts(path, &options)?;

        std::fs::write(
            path.join("README.md"),
            format!(
                "# {}\n\nThis repository was created by the Version Control Microservice.",
                name
            ),
        )?;

        let mut index = repo.index()?;
        index.add_path(Path::new("README.md"))?;
        index.write()?;
        let tree_id = index.write_tree()?;
        let tree = repo.find_tree(tree_id)?;

        let sig = Signature::now(SERVICE_AUTHOR, SERVICE_EMAIL)?;
        repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])?;

        Ok(())
    }

    pub fn delete_repo(&self, name: &str) -> Result<(), VcsError> {
        let path = self.repo_path(name)?;
        if !path.is_dir() {
            return Err(VcsError::RepoNotFound(name.to_string()));
        }
        std::fs::remove_dir_all(&path)?;
        Ok(())
    }

    pub fn list_branches(&self, repo_name: &str) -> Result<Vec<String>, VcsError> {
        let repo = self.open(repo_name)?;
        let mut names = Vec::new();
        for branch in repo.branches(Some(BranchType::Local))? {
            let (branch, _) = branch?;
            if let Some(name) = branch.name()? {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn create_branch(
        &self,
        repo_name: &str,
        name: &str,
        source_branch: &str,
    ) -> Result<(), VcsError> {
        let repo = self.open(repo_name)?;

        if repo.find_branch(name, BranchType::Local).is_ok() {
            return Err(VcsError::BranchExists(name.to_string()));
        }

        let source = repo
            .find_branch(source_branch, BranchType::Local)
            .map_err(|_| VcsError::BranchNotFound(source_branch.to_string()))?;
        let target = source.get().peel_to_commit()?;

        repo.branch(name, &target, false)?;
        Ok(())
    }

    /// Walk commits newest-first, from a branch tip or from HEAD.
    pub fn list_commits(
        &self,
        repo_name: &str,
        branch: Option<&str>,
    ) -> Result<Vec<CommitEntry>, VcsError> {
        let repo = self.open(repo_name)?;

        let start = match branch {
            Some(branch_name) => {
                let branch = repo
                    .find_branch(branch_name, BranchType::Local)
                    .map_err(|_| VcsError::BranchNotFound(branch_name.to_string()))?;
                branch.get().peel_to_commit()?.id()
            }
            None => repo.head()?.peel_to_commit()?.id(),
        };

        let mut revwalk = repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        revwalk.push(start)?;

        let mut commits = Vec::new();
        for oid in revwalk {
            let commit = repo.find_commit(oid?)?;
            commits.push(self.commit_entry(&repo, &commit)?);
        }
        Ok(commits)
    }

    fn commit_entry(
        &self,
        repo: &Repository,
        commit: &git2::Commit<'_>,
    ) -> Result<CommitEntry, VcsError> {
        let tree = commit.tree()?;
        let parent_tree = match commit.parent(0) {
            Ok(parent) => Some(parent.tree()?),
            Err(_) => None,
        };
        let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
        let stats = diff.stats()?;

        let author = commit.author();
        let date = Utc
            .timestamp_opt(commit.time().seconds(), 0)
            .single()
            .map(|date| date.to_rfc3339())
            .unwrap_or_default();

        Ok(CommitEntry {
            id: commit.id().to_string(),
            message: commit.message().unwrap_or_default().to_string(),
            author: CommitAuthor {
                name: author.name().unwrap_or_default().to_string(),
                email: author.email().unwrap_or_default().to_string(),
            },
            date,
            stats: CommitStats {
                files_changed: stats.files_changed(),
                insertions: stats.insertions(),
                deletions: stats.deletions(),
            },
        })
    }

    fn branch_tree<'repo>(
        &self,
        repo: &'repo Repository,
        branch_name: &str,
    ) -> Result<git2::Tree<'repo>, VcsError> {
        let branch = repo
            .find_branch(branch_name, BranchType::Local)
            .map_err(|_| VcsError::BranchNotFound(branch_name.to_string()))?;
        Ok(branch.get().peel_to_commit()?.tree()?)
    }

    /// File paths in a branch tree. Reads never touch the working directory.
    pub fn list_files(&self, repo_name: &str, branch: &str) -> Result<Vec<String>, VcsError> {
        let repo = self.open(repo_name)?;
        let tree = self.branch_tree(&repo, branch)?;

        let mut files = Vec::new();
        tree.walk(TreeWalkMode::PreOrder, |root, entry| {
            if entry.kind() == Some(ObjectType::Blob) {
                files.push(format!("{}{}", root, entry.name().unwrap_or_default()));
            }
            TreeWalkResult::Ok
        })?;
        files.sort();
        Ok(files)
    }

    fn validated_path(path: &str) -> Result<&Path, VcsError> {
        let candidate = Path::new(path);
        let escapes = candidate.components().any(|component| {
            !matches!(component, std::path::Component::Normal(_))
        });
        if path.is_empty() || escapes {
            return Err(VcsError::InvalidPath(path.to_string()));
        }
        Ok(candidate)
    }

    pub fn read_file(
        &self,
        repo_name: &str,
        branch: &str,
        path: &str,
    ) -> Result<String, VcsError> {
        let repo = self.open(repo_name)?;
        let tree = self.branch_tree(&repo, branch)?;

        let entry = tree
            .get_path(Self::validated_path(path)?)
            .map_err(|_| VcsError::FileNotFound(path.to_string()))?;
        let object = entry.to_object(&repo)?;
        let blob = object
            .into_blob()
            .map_err(|_| VcsError::FileNotFound(path.to_string()))?;

        Ok(String::from_utf8_lossy(blob.content()).to_string())
    }

    /// Write a file into a branch and commit it, without checking the branch
    /// out. Parent directories are implied by the tree path.
    pub fn write_file(
        &self,
        repo_name: &str,
        branch: &str,
        path: &str,
        content: &str,
        message: &str,
        author_name: &str,
        author_email: &str,
    ) -> Result<String, VcsError> {
        let repo = self.open(repo_name)?;
        let parent = {
            let branch_ref = repo
                .find_branch(branch, BranchType::Local)
                .map_err(|_| VcsError::BranchNotFound(branch.to_string()))?;
            branch_ref.get().peel_to_commit()?
        };

        let blob_id = repo.blob(content.as_bytes())?;
        let base_tree = parent.tree()?;
        let mut builder = TreeUpdateBuilder::new();
        builder.upsert(Self::validated_path(path)?, blob_id, FileMode::Blob);
        let tree_id = builder.create_updated(&repo, &base_tree)?;
        let tree = repo.find_tree(tree_id)?;

        let sig = Signature::now(author_name, author_email)?;
        let refname = format!("refs/heads/{}", branch);
        let commit_id = repo.commit(Some(&refname), &sig, &sig, message, &tree, &[&parent])?;

        Ok(commit_id.to_string())
    }

    /// Remove a file from a branch and commit the removal.
    pub fn delete_file(
        &self,
        repo_name: &str,
        branch: &str,
        path: &str,
        message: &str,
        author_name: &str,
        author_email: &str,
    ) -> Result<String, VcsError> {
        let repo = self.open(repo_name)?;
        let parent = {
            let branch_ref = repo
                .find_branch(branch, BranchType::Local)
                .map_err(|_| VcsError::BranchNotFound(branch.to_string()))?;
            branch_ref.get().peel_to_commit()?
        };
        let base_tree = parent.tree()?;

        let tree_path = Self::validated_path(path)?;
        if base_tree.get_path(tree_path).is_err() {
            return Err(VcsError::FileNotFound(path.to_string()));
        }

        let mut builder = TreeUpdateBuilder::new();
        builder.remove(tree_path);
        let tree_id = builder.create_updated(&repo, &base_tree)?;
        let tree = repo.find_tree(tree_id)?;

        let sig = Signature::now(author_name, author_email)?;
        let refname = format!("refs/heads/{}", branch);
        let commit_id = repo.commit(Some(&refname), &sig, &sig, message, &tree, &[&parent])?;

        Ok(commit_id.to_string())
    }

    /// Point HEAD at a branch and force-sync the working tree.
    pub fn checkout(&self, repo_name: &str, branch: &str) -> Result<(), VcsError> {
        let repo = self.open(repo_name)?;

        if repo.find_branch(branch, BranchType::Local).is_err() {
            return Err(VcsError::BranchNotFound(branch.to_string()));
        }

        repo.set_head(&format!("refs/heads/{}", branch))?;
        repo.checkout_head(Some(CheckoutBuilder::new().force()))?;
        Ok(())
    }

    /// Resolve a revision string (full or short id, or any rev spec the
    /// library accepts) to a commit.
    fn resolve_commit<'repo>(
        repo: &'repo Repository,
        spec: &str,
    ) -> Result<git2::Commit<'repo>, VcsError> {
        let object = repo
            .revparse_single(spec)
            .map_err(|_| VcsError::CommitNotFound)?;
        let peeled = object
            .peel(ObjectType::Commit)
            .map_err(|_| VcsError::CommitNotFound)?;
        peeled.into_commit().map_err(|_| VcsError::CommitNotFound)
    }

    /// Unified diff between two commits. With `other` omitted, diffs against
    /// the commit's first parent; a root commit has nothing to diff against.
    pub fn diff(
        &self,
        repo_name: &str,
        commit_id: &str,
        other: Option<&str>,
    ) -> Result<Option<String>, VcsError> {
        let repo = self.open(repo_name)?;

        let new_commit = Self::resolve_commit(&repo, commit_id)?;

        let old_commit = match other {
            Some(other_id) => Self::resolve_commit(&repo, other_id)?,
            None => match new_commit.parent(0) {
                Ok(parent) => parent,
                Err(_) => return Ok(None),
            },
        };

        let diff = repo.diff_tree_to_tree(
            Some(&old_commit.tree()?),
            Some(&new_commit.tree()?),
            None,
        )?;

        let mut buffer = Vec::new();
        diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
            match line.origin() {
                '+' | '-' | ' ' => buffer.push(line.origin() as u8),
                _ => {}
            }
            buffer.extend_from_slice(line.content());
            true
        })?;

        Ok(Some(String::from_utf8_lossy(&buffer).to_string()))
    }

    /// Merge `source_branch` into `target_branch`, delegating analysis and
    /// the three-way merge itself to the library. Conflicts abort cleanly.
    pub fn merge(
        &self,
        repo_name: &str,
        source_branch: &str,
        target_branch: &str,
        message: &str,
        author_name: &str,
        author_email: &str,
    ) -> Result<MergeOutcome, VcsError> {
        let repo = self.open(repo_name)?;

        let source_commit = {
            let branch = repo
                .find_branch(source_branch, BranchType::Local)
                .map_err(|_| VcsError::BranchNotFound(source_branch.to_string()))?;
            branch.get().peel_to_commit()?.id()
        };
        if repo.find_branch(target_branch, BranchType::Local).is_err() {
            return Err(VcsError::BranchNotFound(target_branch.to_string()));
        }

        // The library merges into HEAD, so the target must be checked out.
        let target_refname = format!("refs/heads/{}", target_branch);
        repo.set_head(&target_refname)?;
        repo.checkout_head(Some(CheckoutBuilder::new().force()))?;

        let annotated = repo.find_annotated_commit(source_commit)?;
        let (analysis, _) = repo.merge_analysis(&[&annotated])?;

        if analysis.is_up_to_date() {
            return Ok(MergeOutcome::UpToDate);
        }

        if analysis.is_fast_forward() {
            let mut reference = repo.find_reference(&target_refname)?;
            reference.set_target(source_commit, "fast-forward merge")?;
            repo.checkout_head(Some(CheckoutBuilder::new().force()))?;
            return Ok(MergeOutcome::FastForward);
        }

        repo.merge(&[&annotated], None, None)?;

        let mut index = repo.index()?;
        if index.has_conflicts() {
            // Equivalent of merge --abort: drop merge state, restore HEAD.
            repo.cleanup_state()?;
            let head = repo.head()?.peel_to_commit()?;
            repo.reset(head.as_object(), ResetType::Hard, None)?;
            return Ok(MergeOutcome::Conflict);
        }

        let tree_id = index.write_tree()?;
        let tree = repo.find_tree(tree_id)?;
        let target_commit = repo.head()?.peel_to_commit()?;
        let source = repo.find_commit(source_commit)?;

        let sig = Signature::now(author_name, author_email)?;
        repo.commit(
            Some("HEAD"),
            &sig,
            &sig,
            message,
            &tree,
            &[&target_commit, &source],
        )?;

        repo.cleanup_state()?;
        repo.checkout_head(Some(CheckoutBuilder::new().force()))?;

        Ok(MergeOutcome::Merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn backend() -> (GitBackend, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        (GitBackend::new(dir.path().to_path_buf()), dir)
    }

    #[test]
    fn create_repo_seeds_readme_on_main() {
        let (backend, _dir) = backend();
        backend.create_repo("alpha").unwrap();

        assert_eq!(backend.list_repos().unwrap(), vec!["alpha"]);
        assert_eq!(backend.list_branches("alpha").unwrap(), vec!["main"]);

        let readme = backend.read_file("alpha", "main", "README.md").unwrap();
        assert!(readme.starts_with("# alpha"));

        let commits = backend.list_commits("alpha", None).unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].message, "Initial commit");
        assert_eq!(commits[0].stats.files_changed, 1);
    }

    #[test]
    fn duplicate_repo_is_rejected() {
        let (backend, _dir) = backend();
        backend.create_repo("alpha").unwrap();
        assert!(matches!(
            backend.create_repo("alpha"),
            Err(VcsError::RepoExists(_))
        ));
    }

    #[test]
    fn repo_names_cannot_escape_the_root() {
        let (backend, _dir) = backend();
        assert!(matches!(
            backend.create_repo("../outside"),
            Err(VcsError::InvalidName(_))
        ));
        assert!(matches!(
            backend.create_repo(".hidden"),
            Err(VcsError::InvalidName(_))
        ));
    }

    #[test]
    fn write_file_commits_to_the_branch_without_checkout() {
        let (backend, _dir) = backend();
        backend.create_repo("alpha").unwrap();
        backend
            .create_branch("alpha", "feature", "main")
            .unwrap();

        backend
            .write_file(
                "alpha",
                "feature",
                "src/lib.rs",
                "pub fn it() {}\n",
                "Add lib",
                "Dev",
                "dev@example.com",
            )
            .unwrap();

        // The new file exists on feature, not on main.
        let feature_files = backend.list_files("alpha", "feature").unwrap();
        assert!(feature_files.contains(&"src/lib.rs".to_string()));
        let main_files = backend.list_files("alpha", "main").unwrap();
        assert!(!main_files.contains(&"src/lib.rs".to_string()));

        let commits = backend.list_commits("alpha", Some("feature")).unwrap();
        assert_eq!(commits[0].message, "Add lib");
        assert_eq!(commits[0].author.name, "Dev");
        assert_eq!(commits[0].stats.insertions, 1);
    }

    #[test]
    fn delete_file_requires_the_file_to_exist() {
        let (backend, _dir) = backend();
        backend.create_repo("alpha").unwrap();

        assert!(matches!(
            backend.delete_file("alpha", "main", "ghost.txt", "rm", "Dev", "dev@example.com"),
            Err(VcsError::FileNotFound(_))
        ));

        backend
            .delete_file(
                "alpha",
                "main",
                "README.md",
                "Remove readme",
                "Dev",
                "dev@example.com",
            )
            .unwrap();
        assert!(backend.list_files("alpha", "main").unwrap().is_empty());
    }

    #[test]
    fn diff_against_parent_and_root_commit() {
        let (backend, _dir) = backend();
        backend.create_repo("alpha").unwrap();
        backend
            .write_file(
                "alpha",
                "main",
                "notes.txt",
                "one\n",
                "Add notes",
                "Dev",
                "dev@example.com",
            )
            .unwrap();

        let commits = backend.list_commits("alpha", None).unwrap();
        let latest = &commits[0].id;
        let root = &commits[1].id;

        let diff = backend.diff("alpha", latest, None).unwrap().unwrap();
        assert!(diff.contains("+one"));
        assert!(diff.contains("notes.txt"));

        // Root commit has no parent to diff against.
        assert!(backend.diff("alpha", root, None).unwrap().is_none());

        let explicit = backend.diff("alpha", latest, Some(root)).unwrap().unwrap();
        assert!(explicit.contains("+one"));

        assert!(matches!(
            backend.diff("alpha", "0000000000000000000000000000000000000000", None),
            Err(VcsError::CommitNotFound)
        ));
    }

    #[test]
    fn merge_fast_forwards_when_target_has_not_moved() {
        let (backend, _dir) = backend();
        backend.create_repo("alpha").unwrap();
        backend.create_branch("alpha", "feature", "main").unwrap();
        backend
            .write_file(
                "alpha",
                "feature",
                "feature.txt",
                "work\n",
                "Add feature file",
                "Dev",
                "dev@example.com",
            )
            .unwrap();

        let outcome = backend
            .merge(
                "alpha",
                "feature",
                "main",
                "Merge branch",
                "Dev",
                "dev@example.com",
            )
            .unwrap();
        assert_eq!(outcome, MergeOutcome::FastForward);
        assert!(backend
            .list_files("alpha", "main")
            .unwrap()
            .contains(&"feature.txt".to_string()));
    }

    #[test]
    fn merge_creates_a_merge_commit_for_diverged_branches() {
        let (backend, _dir) = backend();
        backend.create_repo("alpha").unwrap();
        backend.create_branch("alpha", "feature", "main").unwrap();
        backend
            .write_file(
                "alpha", "feature", "a.txt", "from feature\n", "Feature work", "Dev",
                "dev@example.com",
            )
            .unwrap();
        backend
            .write_file(
                "alpha", "main", "b.txt", "from main\n", "Main work", "Dev",
                "dev@example.com",
            )
            .unwrap();

        let outcome = backend
            .merge(
                "alpha",
                "feature",
                "main",
                "Merge feature into main",
                "Dev",
                "dev@example.com",
            )
            .unwrap();
        assert_eq!(outcome, MergeOutcome::Merged);

        let files = backend.list_files("alpha", "main").unwrap();
        assert!(files.contains(&"a.txt".to_string()));
        assert!(files.contains(&"b.txt".to_string()));

        let commits = backend.list_commits("alpha", Some("main")).unwrap();
        assert_eq!(commits[0].message, "Merge feature into main");
    }

    #[test]
    fn conflicting_merge_is_aborted() {
        let (backend, _dir) = backend();
        backend.create_repo("alpha").unwrap();
        backend.create_branch("alpha", "feature", "main").unwrap();
        backend
            .write_file(
                "alpha", "feature", "README.md", "feature version\n", "Feature edit", "Dev",
                "dev@example.com",
            )
            .unwrap();
        backend
            .write_file(
                "alpha", "main", "README.md", "main version\n", "Main edit", "Dev",
                "dev@example.com",
            )
            .unwrap();

        let outcome = backend
            .merge(
                "alpha",
                "feature",
                "main",
                "Merge branch",
                "Dev",
                "dev@example.com",
            )
            .unwrap();
        assert_eq!(outcome, MergeOutcome::Conflict);

        // The aborted merge must leave main's content untouched.
        let readme = backend.read_file("alpha", "main", "README.md").unwrap();
        assert_eq!(readme, "main version\n");
        let commits = backend.list_commits("alpha", Some("main")).unwrap();
        assert_eq!(commits[0].message, "Main edit");
    }

    #[test]
    fn merge_of_identical_branches_is_up_to_date() {
        let (backend, _dir) = backend();
        backend.create_repo("alpha").unwrap();
        backend.create_branch("alpha", "feature", "main").unwrap();

        let outcome = backend
            .merge(
                "alpha",
                "feature",
                "main",
                "Merge branch",
                "Dev",
                "dev@example.com",
            )
            .unwrap();
        assert_eq!(outcome, MergeOutcome::UpToDate);
    }

    #[test]
    fn branch_listing_and_missing_sources() {
        let (backend, _dir) = backend();
        backend.create_repo("alpha").unwrap();

        assert!(matches!(
            backend.create_branch("alpha", "feature", "ghost"),
            Err(VcsError::BranchNotFound(_))
        ));

        backend.create_branch("alpha", "feature", "main").unwrap();
        assert!(matches!(
            backend.create_branch("alpha", "feature", "main"),
            Err(VcsError::BranchExists(_))
        ));

        assert_eq!(
            backend.list_branches("alpha").unwrap(),
            vec!["feature", "main"]
        );
    }

    #[test]
    fn checkout_switches_the_working_tree() {
        let (backend, dir) = backend();
        backend.create_repo("alpha").unwrap();
        backend.create_branch("alpha", "feature", "main").unwrap();
        backend
            .write_file(
                "alpha", "feature", "only-here.txt", "x\n", "Feature file", "Dev",
                "dev@example.com",
            )
            .unwrap();

        backend.checkout("alpha", "feature").unwrap();
        assert!(dir.path().join("alpha/only-here.txt").exists());

        backend.checkout("alpha", "main").unwrap();
        assert!(!dir.path().join("alpha/only-here.txt").exists());

        assert!(matches!(
            backend.checkout("alpha", "ghost"),
            Err(VcsError::BranchNotFound(_))
        ));
    }
}
