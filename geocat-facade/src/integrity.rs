//! Referential integrity between catalog entities.
//!
//! Outgoing references must resolve on add and save. Removal is refused while
//! anything still points at the target; nothing cascades.

use crate::{CatalogError, CatalogFacade, CatalogResult};
use geocat_model::{CatalogId, CatalogInfo, InfoType, LayerGroup, ModelError, Predicate};
use std::collections::HashSet;

/// Who may point at an entity of a given type, and through which property.
fn referrers(info_type: InfoType) -> &'static [(InfoType, &'static str)] {
    match info_type {
        InfoType::Workspace => &[
            (InfoType::Store, "workspace.id"),
            (InfoType::Style, "workspace.id"),
            (InfoType::LayerGroup, "workspace.id"),
        ],
        InfoType::Namespace => &[(InfoType::Resource, "namespace.id")],
        InfoType::Store => &[(InfoType::Resource, "store.id")],
        InfoType::Resource => &[(InfoType::Layer, "resource.id")],
        InfoType::Style => &[
            (InfoType::Layer, "defaultStyle.id"),
            (InfoType::Layer, "styles.id"),
            (InfoType::LayerGroup, "styles.id"),
        ],
        InfoType::Layer | InfoType::LayerGroup => &[(InfoType::LayerGroup, "layers.id")],
        InfoType::Map => &[],
    }
}

impl CatalogFacade {
    /// Fails with `ReferenceNotFound` if any outgoing reference dangles.
    pub(crate) fn check_references<T: CatalogInfo>(&self, info: &T) -> CatalogResult<()> {
        for reference in info.references() {
            if !self.store.exists(reference.info_type, &reference.id)? {
                return Err(CatalogError::ReferenceNotFound {
                    property: reference.property.to_string(),
                    info_type: reference.info_type,
                    id: reference.id.to_string(),
                });
            }
        }
        self.check_group_cycle(info)
    }

    /// A layer group may not contain itself, directly or through nesting.
    fn check_group_cycle<T: CatalogInfo>(&self, info: &T) -> CatalogResult<()> {
        if T::TYPE != InfoType::LayerGroup {
            return Ok(());
        }
        let Some(own) = info.id() else {
            return Ok(());
        };
        let mut pending: Vec<CatalogId> = info
            .references()
            .into_iter()
            .filter(|r| r.property == "layers" && r.info_type == InfoType::LayerGroup)
            .map(|r| r.id)
            .collect();
        let mut seen = HashSet::new();
        while let Some(id) = pending.pop() {
            if &id == own {
                return Err(CatalogError::Validation(ModelError::Invalid {
                    info_type: InfoType::LayerGroup,
                    message: format!("layer group {own} contains itself"),
                }));
            }
            if !seen.insert(id.clone()) {
                continue;
            }
            if let Some(nested) = self.store.get_by_id::<LayerGroup>(&id)? {
                pending.extend(nested.nested_groups().cloned());
            }
        }
        Ok(())
    }

    /// Fails with `StillReferenced` if any entity points at `id`.
    pub(crate) fn check_unreferenced(&self, info_type: InfoType, id: &CatalogId) -> CatalogResult<()> {
        for (referrer, property) in referrers(info_type) {
            let count = self
                .store
                .count_type(*referrer, &Predicate::equal(*property, id))?;
            if count > 0 {
                return Err(CatalogError::StillReferenced {
                    info_type,
                    id: id.to_string(),
                    referrer: *referrer,
                    count,
                });
            }
        }
        Ok(())
    }
}
