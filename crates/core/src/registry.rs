//! In-memory module registry.
//!
//! Tracks which assistant modules are installed and whether they are active.
//! Nothing is actually loaded; the registry is bookkeeping for the dashboard.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Module with id '{0}' not found")]
    NotFound(u32),
    #[error("Module '{0}' is already installed")]
    AlreadyInstalled(String),
    #[error("Module '{0}' is not in the catalog")]
    NotInCatalog(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleStatus {
    Active,
    Inactive,
}

impl ModuleStatus {
    fn toggled(self) -> Self {
        match self {
            ModuleStatus::Active => ModuleStatus::Inactive,
            ModuleStatus::Inactive => ModuleStatus::Active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: u32,
    pub name: String,
    pub status: ModuleStatus,
    pub version: String,
}

/// A module that can be installed from the catalog.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
}

/// A catalog entry annotated with whether it is already installed.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogListing {
    #[serde(flatten)]
    pub entry: CatalogEntry,
    pub installed: bool,
}

pub static MODULE_CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        name: "Natural Language Processing",
        version: "2.3.1",
        description: "Advanced NLP capabilities",
    },
    CatalogEntry {
        name: "Image Recognition",
        version: "1.5.0",
        description: "Computer vision and image analysis",
    },
    CatalogEntry {
        name: "Data Analytics",
        version: "3.1.2",
        description: "Real-time data processing and analytics",
    },
    CatalogEntry {
        name: "Cloud Sync",
        version: "2.0.5",
        description: "Cloud synchronization service",
    },
    CatalogEntry {
        name: "Security Module",
        version: "4.2.0",
        description: "Enhanced security and encryption",
    },
    CatalogEntry {
        name: "Notification System",
        version: "1.8.1",
        description: "Push notifications and alerts",
    },
];

const BUILT_IN_MODULES: &[(&str, &str)] = &[
    ("Voice Recognition", "2.1.0"),
    ("Text-to-Speech", "1.8.2"),
    ("Screen Control", "3.0.1"),
    ("API Gateway", "2.5.0"),
];

/// Bumps the minor component of a dotted version and resets the patch.
/// Missing or non-numeric components count as zero.
pub fn bump_minor(version: &str) -> String {
    let mut parts = version.split('.').map(|p| p.trim().parse::<u64>().unwrap_or(0));
    let major = parts.next().unwrap_or(0);
    let minor = parts.next().unwrap_or(0);
    format!("{}.{}.0", major, minor + 1)
}

#[derive(Debug, Clone)]
pub struct ModuleRegistry {
    modules: Vec<Module>,
    next_id: u32,
}

impl Default for ModuleRegistry {
    /// A registry with the four built-in modules, all active.
    fn default() -> Self {
        let mut registry = Self::empty();
        for (name, version) in BUILT_IN_MODULES {
            registry.insert(name, version);
        }
        registry
    }
}

impl ModuleRegistry {
    pub fn empty() -> Self {
        Self {
            modules: Vec::new(),
            next_id: 1,
        }
    }

    pub fn list(&self) -> &[Module] {
        &self.modules
    }

    pub fn get(&self, id: u32) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == id)
    }

    pub fn is_installed(&self, name: &str) -> bool {
        self.modules.iter().any(|m| m.name == name)
    }

    /// Installs a catalog module by name. New modules start active.
    pub fn install(&mut self, name: &str) -> Result<Module, RegistryError> {
        let entry = MODULE_CATALOG
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| RegistryError::NotInCatalog(name.to_string()))?;
        if self.is_installed(entry.name) {
            return Err(RegistryError::AlreadyInstalled(entry.name.to_string()));
        }
        let module = self.insert(entry.name, entry.version);
        info!(module = %module.name, id = module.id, "Module installed");
        Ok(module)
    }

    pub fn uninstall(&mut self, id: u32) -> Result<Module, RegistryError> {
        let index = self
            .modules
            .iter()
            .position(|m| m.id == id)
            .ok_or(RegistryError::NotFound(id))?;
        let module = self.modules.remove(index);
        info!(module = %module.name, id, "Module uninstalled");
        Ok(module)
    }

    pub fn toggle(&mut self, id: u32) -> Result<Module, RegistryError> {
        let module = self.get_mut(id)?;
        module.status = module.status.toggled();
        info!(module = %module.name, status = ?module.status, "Module toggled");
        Ok(module.clone())
    }

    pub fn update(&mut self, id: u32) -> Result<Module, RegistryError> {
        let module = self.get_mut(id)?;
        module.version = bump_minor(&module.version);
        info!(module = %module.name, version = %module.version, "Module updated");
        Ok(module.clone())
    }

    /// Catalog entries whose name contains `term`, ignoring case.
    pub fn search_catalog(&self, term: &str) -> Vec<CatalogListing> {
        let term = term.to_lowercase();
        MODULE_CATALOG
            .iter()
            .filter(|e| e.name.to_lowercase().contains(&term))
            .map(|e| CatalogListing {
                entry: *e,
                installed: self.is_installed(e.name),
            })
            .collect()
    }

    fn get_mut(&mut self, id: u32) -> Result<&mut Module, RegistryError> {
        self.modules
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(RegistryError::NotFound(id))
    }

    fn insert(&mut self, name: &str, version: &str) -> Module {
        let module = Module {
            id: self.next_id,
            name: name.to_string(),
            status: ModuleStatus::Active,
            version: version.to_string(),
        };
        self.next_id += 1;
        self.modules.push(module.clone());
        module
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_has_built_ins() {
        let registry = ModuleRegistry::default();
        let names: Vec<_> = registry.list().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Voice Recognition", "Text-to-Speech", "Screen Control", "API Gateway"]
        );
        assert!(registry.list().iter().all(|m| m.status == ModuleStatus::Active));
        assert_eq!(registry.get(3).unwrap().version, "3.0.1");
    }

    #[test]
    fn test_install_from_catalog() {
        let mut registry = ModuleRegistry::default();
        let module = registry.install("Cloud Sync").unwrap();
        assert_eq!(module.id, 5);
        assert_eq!(module.version, "2.0.5");
        assert_eq!(module.status, ModuleStatus::Active);

        assert_eq!(
            registry.install("Cloud Sync"),
            Err(RegistryError::AlreadyInstalled("Cloud Sync".to_string()))
        );
        assert_eq!(
            registry.install("Teleportation"),
            Err(RegistryError::NotInCatalog("Teleportation".to_string()))
        );
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut registry = ModuleRegistry::default();
        registry.uninstall(4).unwrap();
        let module = registry.install("Data Analytics").unwrap();
        assert_eq!(module.id, 5);
        assert!(registry.get(4).is_none());
    }

    #[test]
    fn test_toggle_flips_status() {
        let mut registry = ModuleRegistry::default();
        assert_eq!(registry.toggle(1).unwrap().status, ModuleStatus::Inactive);
        assert_eq!(registry.toggle(1).unwrap().status, ModuleStatus::Active);
        assert_eq!(registry.toggle(99), Err(RegistryError::NotFound(99)));
    }

    #[test]
    fn test_update_bumps_minor_version() {
        let mut registry = ModuleRegistry::default();
        assert_eq!(registry.update(1).unwrap().version, "2.2.0");
        assert_eq!(registry.update(1).unwrap().version, "2.3.0");
        assert_eq!(bump_minor("7"), "7.1.0");
        assert_eq!(bump_minor("beta"), "0.1.0");
    }

    #[test]
    fn test_uninstall_unknown_module() {
        let mut registry = ModuleRegistry::default();
        assert_eq!(registry.uninstall(42), Err(RegistryError::NotFound(42)));
        assert_eq!(registry.list().len(), 4);
    }

    #[test]
    fn test_search_catalog_marks_installed() {
        let mut registry = ModuleRegistry::default();
        registry.install("Security Module").unwrap();

        let all = registry.search_catalog("");
        assert_eq!(all.len(), MODULE_CATALOG.len());

        let hits = registry.search_catalog("SEC");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entry.name, "Security Module");
        assert!(hits[0].installed);

        let hits = registry.search_catalog("image");
        assert!(!hits[0].installed);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let module = ModuleRegistry::default().get(1).cloned().unwrap();
        let json = serde_json::to_string(&module).unwrap();
        assert!(json.contains(r#""status":"active""#));
    }
}
