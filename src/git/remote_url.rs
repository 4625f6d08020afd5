// ABOUTME: Rewrites an HTTPS clone URL into the SSH form used for the push remote.
// ABOUTME: https://github.com/owner/repo.git becomes git@github.com:owner/repo.git.

use url::Url;

use super::PushError;

/// Build the SSH remote for `clone_url`, optionally replacing its host.
pub fn ssh_remote_url(clone_url: &str, host_override: Option<&str>) -> Result<String, PushError> {
    let invalid = |reason: &str| PushError::InvalidCloneUrl {
        url: clone_url.to_string(),
        reason: reason.to_string(),
    };

    let parsed = Url::parse(clone_url).map_err(|e| invalid(&e.to_string()))?;
    let host = match host_override {
        Some(host) => host,
        None => parsed.host_str().ok_or_else(|| invalid("missing host"))?,
    };

    let path = parsed.path().trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    if path.is_empty() {
        return Err(invalid("missing repository path"));
    }

    Ok(format!("git@{}:{}.git", host, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_https_clone_url() {
        assert_eq!(
            ssh_remote_url("https://github.com/codestam-store/wanderlust.git", None).unwrap(),
            "git@github.com:codestam-store/wanderlust.git"
        );
    }

    #[test]
    fn handles_missing_git_suffix() {
        assert_eq!(
            ssh_remote_url("https://github.com/octocat/demo-app", None).unwrap(),
            "git@github.com:octocat/demo-app.git"
        );
    }

    #[test]
    fn host_override_replaces_host() {
        assert_eq!(
            ssh_remote_url("https://github.com/octocat/demo-app.git", Some("github-work"))
                .unwrap(),
            "git@github-work:octocat/demo-app.git"
        );
    }

    #[test]
    fn rejects_url_without_path() {
        assert!(matches!(
            ssh_remote_url("https://github.com/", None),
            Err(PushError::InvalidCloneUrl { .. })
        ));
    }

    #[test]
    fn rejects_garbage() {
        assert!(ssh_remote_url("not a url", None).is_err());
    }
}
