use crate::{CatalogError, CatalogFacade, CatalogResult};
use geocat_model::{CatalogInfo, InfoType, Namespace, Predicate, Workspace};

/// Which workspace a lookup is restricted to.
#[derive(Debug, Clone, Copy)]
pub enum WorkspaceScope<'a> {
    /// No restriction.
    Any,
    /// The current default workspace. Matches nothing when none is set.
    Default,
    /// Only entities that belong to no workspace.
    Global,
    In(&'a Workspace),
}

/// Which namespace a lookup is restricted to.
#[derive(Debug, Clone, Copy)]
pub enum NamespaceScope<'a> {
    Any,
    /// The current default namespace. Matches nothing when none is set.
    Default,
    In(&'a Namespace),
}

impl WorkspaceScope<'_> {
    /// The filter on `workspace.id`, or `None` if the scope matches nothing.
    pub(crate) fn predicate(&self, facade: &CatalogFacade) -> CatalogResult<Option<Predicate>> {
        match self {
            WorkspaceScope::Any => Ok(Some(Predicate::AcceptAll)),
            WorkspaceScope::Global => Ok(Some(Predicate::is_null("workspace.id"))),
            WorkspaceScope::In(ws) => {
                let id = ws.id().ok_or(CatalogError::MissingId(InfoType::Workspace))?;
                Ok(Some(Predicate::equal("workspace.id", id)))
            }
            WorkspaceScope::Default => Ok(facade
                .get_default_workspace()?
                .and_then(|ws| ws.id)
                .map(|id| Predicate::equal("workspace.id", id))),
        }
    }
}

impl NamespaceScope<'_> {
    /// The filter on `namespace.id`, or `None` if the scope matches nothing.
    pub(crate) fn predicate(&self, facade: &CatalogFacade) -> CatalogResult<Option<Predicate>> {
        match self {
            NamespaceScope::Any => Ok(Some(Predicate::AcceptAll)),
            NamespaceScope::In(ns) => {
                let id = ns.id().ok_or(CatalogError::MissingId(InfoType::Namespace))?;
                Ok(Some(Predicate::equal("namespace.id", id)))
            }
            NamespaceScope::Default => Ok(facade
                .get_default_namespace()?
                .and_then(|ns| ns.id)
                .map(|id| Predicate::equal("namespace.id", id))),
        }
    }
}
