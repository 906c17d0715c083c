//! Storage layer for project templates.
//!
//! Each project lives in its own directory, keyed by uuid:
//!
//! ```text
//! <config_dir>/templates/<uuid>/template.yaml
//! ```
//!
//! The uuid is never written into the file; it is recovered from the
//! directory name on load.

use crate::models::Project;
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of a template inside its project directory.
pub const TEMPLATE_FILE: &str = "template.yaml";

/// Directory holding project directories, relative to the config dir.
pub const TEMPLATES_DIR: &str = "templates";

/// Stored project templates.
pub trait Catalog {
    /// All projects, sorted by name.
    fn list(&self) -> Result<Vec<Project>>;

    /// Project whose name, or failing that uuid, equals `key`.
    fn find(&self, key: &str) -> Result<Project>;

    /// Read the project stored under `uuid`, surfacing parse errors.
    fn load(&self, uuid: &str) -> Result<Project>;

    /// Persist `project`, assigning a uuid if it has none.
    fn save(&self, project: &mut Project) -> Result<()>;

    /// Remove the project stored under `uuid`.
    fn delete(&self, uuid: &str) -> Result<()>;

    /// Path of the file backing `project`.
    fn template_path(&self, project: &Project) -> PathBuf;
}

impl<T: Catalog + ?Sized> Catalog for &T {
    fn list(&self) -> Result<Vec<Project>> {
        (**self).list()
    }

    fn find(&self, key: &str) -> Result<Project> {
        (**self).find(key)
    }

    fn load(&self, uuid: &str) -> Result<Project> {
        (**self).load(uuid)
    }

    fn save(&self, project: &mut Project) -> Result<()> {
        (**self).save(project)
    }

    fn delete(&self, uuid: &str) -> Result<()> {
        (**self).delete(uuid)
    }

    fn template_path(&self, project: &Project) -> PathBuf {
        (**self).template_path(project)
    }
}

/// [`Catalog`] backed by YAML files on disk.
#[derive(Debug, Clone)]
pub struct YamlCatalog {
    root: PathBuf,
}

impl YamlCatalog {
    /// Catalog stored under `config_dir/templates`.
    pub fn new(config_dir: &Path) -> Self {
        Self {
            root: config_dir.join(TEMPLATES_DIR),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn project_dir(&self, uuid: &str) -> PathBuf {
        self.root.join(uuid)
    }
}

impl Catalog for YamlCatalog {
    fn load(&self, uuid: &str) -> Result<Project> {
        let path = self.project_dir(uuid).join(TEMPLATE_FILE);
        if !path.is_file() {
            return Err(Error::NotFound(format!("template '{}'", uuid)));
        }
        let text = fs::read_to_string(&path)?;
        let mut project: Project = serde_yaml::from_str(&text)?;
        project.uuid = uuid.to_string();
        Ok(project)
    }

    fn list(&self) -> Result<Vec<Project>> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
        }

        let mut projects = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let uuid = entry.file_name().to_string_lossy().into_owned();
            match self.load(&uuid) {
                Ok(project) => projects.push(project),
                Err(e) => {
                    tracing::warn!(path = %entry.path().display(), error = %e, "skipping unreadable template");
                }
            }
        }

        projects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(projects)
    }

    fn find(&self, key: &str) -> Result<Project> {
        let projects = self.list()?;
        if let Some(project) = projects.iter().find(|p| p.name == key) {
            return Ok(project.clone());
        }
        projects
            .into_iter()
            .find(|p| p.uuid == key)
            .ok_or_else(|| Error::NotFound(format!("template '{}'", key)))
    }

    fn save(&self, project: &mut Project) -> Result<()> {
        if project.uuid.is_empty() {
            project.uuid = uuid::Uuid::new_v4().to_string();
        }

        let dir = self.project_dir(&project.uuid);
        fs::create_dir_all(&dir)?;
        let text = serde_yaml::to_string(project)?;
        fs::write(dir.join(TEMPLATE_FILE), text)?;

        tracing::debug!(name = %project.name, uuid = %project.uuid, "saved template");
        Ok(())
    }

    fn delete(&self, uuid: &str) -> Result<()> {
        if uuid.is_empty() {
            return Err(Error::InvalidTemplateArgs(
                "project uuid cannot be empty".to_string(),
            ));
        }
        let dir = self.project_dir(uuid);
        if !dir.is_dir() {
            return Err(Error::NotFound(format!("template '{}'", uuid)));
        }
        fs::remove_dir_all(&dir)?;
        tracing::debug!(uuid, "deleted template");
        Ok(())
    }

    fn template_path(&self, project: &Project) -> PathBuf {
        self.project_dir(&project.uuid).join(TEMPLATE_FILE)
    }
}
