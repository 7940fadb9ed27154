//! Property-based tests for locator resolution and status mapping

use cpstatus_core::{map_status, resolve_str, CommitState, LocatorHosts, ResolveError};
use proptest::prelude::*;

const REDIRECT: &str =
    "https://eu-west-1.console.aws.amazon.com/codesuite/settings/connections/redirect";

// GitHub owner/repo names: alphanumerics, dash, underscore, dot
fn arb_segment() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z0-9_][A-Za-z0-9_.-]{0,30}").expect("valid regex")
}

fn arb_tail() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("/".to_string()),
        "[0-9a-f]{40}".prop_map(|sha| format!("/commit/{}", sha)),
        "[a-z]{1,10}".prop_map(|branch| format!("/tree/{}", branch)),
    ]
}

fn arb_host() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{1,12}\\.(com|org|io|net)").expect("valid regex")
}

proptest! {
    #[test]
    fn test_source_host_yields_owner_repo(owner in arb_segment(), repo in arb_segment(), tail in arb_tail()) {
        let url = format!("https://github.com/{}/{}{}", owner, repo, tail);
        let resolved = resolve_str(&url, &LocatorHosts::default()).unwrap();
        prop_assert_eq!(resolved.as_str(), format!("{}/{}", owner, repo));
    }

    #[test]
    fn test_single_segment_is_too_few(owner in arb_segment()) {
        let url = format!("https://github.com/{}", owner);
        prop_assert_eq!(
            resolve_str(&url, &LocatorHosts::default()),
            Err(ResolveError::TooFewPathComponents)
        );
    }

    #[test]
    fn test_redirect_returns_param_unchanged(owner in arb_segment(), repo in arb_segment()) {
        let id = format!("{}/{}", owner, repo);
        let url = format!("{}?FullRepositoryId={}&Branch=main", REDIRECT, id);
        let resolved = resolve_str(&url, &LocatorHosts::default()).unwrap();
        prop_assert_eq!(resolved.as_str(), id.as_str());
    }

    #[test]
    fn test_redirect_other_path_is_unexpected(path in "/[a-z]{1,10}(/[a-z]{1,10}){0,3}") {
        prop_assume!(path != "/codesuite/settings/connections/redirect");
        let url = format!(
            "https://eu-west-1.console.aws.amazon.com{}?FullRepositoryId=acme/widgets",
            path
        );
        prop_assert_eq!(
            resolve_str(&url, &LocatorHosts::default()),
            Err(ResolveError::UnexpectedPath(path))
        );
    }

    #[test]
    fn test_redirect_without_param_is_missing(key in "[A-Za-z]{1,12}", value in "[a-z]{0,8}") {
        prop_assume!(key != "FullRepositoryId");
        let url = format!("{}?{}={}", REDIRECT, key, value);
        prop_assert_eq!(
            resolve_str(&url, &LocatorHosts::default()),
            Err(ResolveError::MissingRepositoryParam)
        );
    }

    #[test]
    fn test_other_hosts_are_unknown(host in arb_host(), owner in arb_segment(), repo in arb_segment()) {
        prop_assume!(host != "github.com");
        let url = format!("https://{}/{}/{}", host, owner, repo);
        prop_assert_eq!(
            resolve_str(&url, &LocatorHosts::default()),
            Err(ResolveError::UnknownHost(host))
        );
    }

    #[test]
    fn test_unlisted_status_is_failure(status in ".*") {
        prop_assume!(status != "InProgress" && status != "Succeeded");
        prop_assert_eq!(map_status(&status), CommitState::Failure);
    }

    #[test]
    fn test_resolver_never_panics(input in ".{0,200}") {
        let _ = resolve_str(&input, &LocatorHosts::default());
    }
}
