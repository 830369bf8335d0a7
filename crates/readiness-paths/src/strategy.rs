use crate::priority::Priority;
use anyhow::Result;
use readiness_core::{InstallationKind, PathKind, PathRequest, PathResponse};

/// One way of turning a `PathRequest` into a filesystem path. Strategies
/// only ever read the filesystem; resolution has no side effects (spec
/// invariant: resolution is pure except for filesystem reads).
pub trait PathStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn supported_path_kinds(&self) -> &'static [PathKind];
    fn supported_installation_kinds(&self) -> &'static [InstallationKind];
    fn priority(&self, path_kind: PathKind, installation_kind: InstallationKind) -> Priority;

    fn can_handle(&self, request: &PathRequest) -> bool {
        self.supported_path_kinds().contains(&request.path_kind)
            && self.supported_installation_kinds().contains(&request.installation_kind)
    }

    fn resolve(&self, request: &PathRequest) -> Result<PathResponse>;
}
