//! Application service.
//!
//! Glues the template catalog, the session engine and the interactive
//! selector into the user-facing operations. Every collaborator is passed
//! in by the caller.

use crate::editor::EditorLauncher;
use crate::models::{Candidate, LiveSession, Project, SessionName, Template, Window};
use crate::selector::Selector;
use crate::session::{Multiplexer, SessionEngine, resolve_session_name};
use crate::storage::Catalog;
use crate::{Error, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Name of the single window a freshly created template gets.
pub const DEFAULT_WINDOW: &str = "shell";

/// What `open` ended up attaching to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opened {
    Template { project: String, session: SessionName },
    Live { session: SessionName },
}

/// Build the selector's candidate list.
///
/// Live sessions come first in the order tmux reports them, minus those a
/// stored template already resolves to. Templates follow, sorted by display
/// name ignoring case.
pub fn merge_candidates(templates: Vec<Project>, live: Vec<LiveSession>) -> Vec<Candidate> {
    let covered: HashSet<SessionName> = templates
        .iter()
        .filter_map(|p| resolve_session_name(p).ok())
        .collect();

    let mut templates = templates;
    templates.sort_by_key(|p| p.display_name().to_lowercase());

    live.into_iter()
        .filter(|s| !covered.contains(&s.name))
        .map(Candidate::Live)
        .chain(templates.into_iter().map(Candidate::Template))
        .collect()
}

pub struct AppService<C: Catalog, M: Multiplexer, S: Selector> {
    catalog: C,
    engine: SessionEngine<M>,
    selector: S,
}

impl<C: Catalog, M: Multiplexer, S: Selector> AppService<C, M, S> {
    pub fn new(catalog: C, engine: SessionEngine<M>, selector: S) -> Self {
        Self {
            catalog,
            engine,
            selector,
        }
    }

    /// Ask the user to pick one of `candidates`.
    fn select(&self, candidates: Vec<Candidate>, prompt: &str, what: &str) -> Result<Candidate> {
        if candidates.is_empty() {
            return Err(Error::NotFound(format!("no {} to choose from", what)));
        }
        let labels: Vec<String> = candidates.iter().map(Candidate::label).collect();
        let choice = self.selector.select(&labels, prompt)?;

        candidates
            .into_iter()
            .zip(labels)
            .find(|(_, label)| *label == choice)
            .map(|(candidate, _)| candidate)
            .ok_or_else(|| Error::NotFound(format!("'{}' is not one of the choices", choice)))
    }

    /// Look a template up by name or uuid, or let the user pick one.
    pub fn find_or_select(&self, name: Option<&str>, prompt: &str) -> Result<Project> {
        if let Some(name) = name {
            return self.catalog.find(name);
        }
        let candidates = merge_candidates(self.catalog.list()?, Vec::new());
        match self.select(candidates, prompt, "templates")? {
            Candidate::Template(project) => Ok(project),
            Candidate::Live(session) => Err(Error::NotFound(format!(
                "'{}' has no template",
                session.name
            ))),
        }
    }

    /// Save a new template rooted at `root` with a single window.
    ///
    /// The name defaults to the last component of `root`.
    pub fn create_project(&self, name: Option<&str>, root: &Path) -> Result<Project> {
        let root = std::path::absolute(root)?;
        let name = match name {
            Some(name) => name.to_string(),
            None => root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    Error::InvalidTemplateArgs(format!(
                        "cannot derive a project name from '{}'",
                        root.display()
                    ))
                })?,
        };

        match self.catalog.find(&name) {
            Ok(_) => return Err(Error::AlreadyExists(format!("template '{}'", name))),
            Err(Error::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        let template = Template::new(
            root.to_string_lossy().into_owned(),
            vec![Window::new(DEFAULT_WINDOW)],
        );
        let mut project = Project::new(name, template);
        project.validate()?;
        self.catalog.save(&mut project)?;

        tracing::info!(name = %project.name, uuid = %project.uuid, "template created");
        Ok(project)
    }

    /// Open a template or running session by name, or let the user pick one.
    ///
    /// A name is matched against templates first; running sessions are only
    /// consulted when no template has that name.
    pub fn open_project(&self, name: Option<&str>) -> Result<Opened> {
        let candidate = match name {
            Some(name) => match self.catalog.find(name) {
                Ok(project) => Candidate::Template(project),
                Err(Error::NotFound(_)) => {
                    let session = self
                        .engine
                        .list_active_sessions()?
                        .into_iter()
                        .find(|s| s.name.as_str() == name)
                        .ok_or_else(|| {
                            Error::NotFound(format!("no template or session named '{}'", name))
                        })?;
                    Candidate::Live(session)
                }
                Err(e) => return Err(e),
            },
            None => {
                let templates = self.catalog.list()?;
                let live = self.engine.list_active_sessions()?;
                self.select(
                    merge_candidates(templates, live),
                    "open> ",
                    "templates or sessions",
                )?
            }
        };

        match candidate {
            Candidate::Template(project) => {
                let session = self.engine.attach_project(&project)?;
                Ok(Opened::Template {
                    project: project.name,
                    session,
                })
            }
            Candidate::Live(live) => {
                self.engine.attach_live(&live)?;
                Ok(Opened::Live { session: live.name })
            }
        }
    }

    /// Remove a stored template. Running sessions are left alone.
    pub fn delete_project(&self, name: Option<&str>) -> Result<Project> {
        let project = self.find_or_select(name, "delete> ")?;
        self.catalog.delete(&project.uuid)?;
        tracing::info!(name = %project.name, "template deleted");
        Ok(project)
    }

    /// Open a template file in `editor`, then reload and validate it.
    pub fn edit_project<E: EditorLauncher>(
        &self,
        name: Option<&str>,
        editor: &E,
    ) -> Result<(Project, PathBuf)> {
        let project = self.find_or_select(name, "edit> ")?;
        let path = self.catalog.template_path(&project);
        editor.edit(&path)?;

        let reloaded = self.catalog.load(&project.uuid)?;
        reloaded.validate()?;
        Ok((reloaded, path))
    }

    /// Kill a running session by name, or let the user pick one.
    pub fn kill_session(&self, name: Option<&str>) -> Result<LiveSession> {
        let live = self.engine.list_active_sessions()?;
        let session = match name {
            Some(name) => live
                .into_iter()
                .find(|s| s.name.as_str() == name)
                .ok_or_else(|| Error::NotFound(format!("session '{}' is not running", name)))?,
            None => {
                let candidates = live.into_iter().map(Candidate::Live).collect();
                match self.select(candidates, "kill> ", "running sessions")? {
                    Candidate::Live(session) => session,
                    Candidate::Template(project) => {
                        return Err(Error::NotFound(format!(
                            "'{}' is not a running session",
                            project.name
                        )));
                    }
                }
            }
        };
        self.engine.kill_session(&session)?;
        Ok(session)
    }

    /// Stored templates and running sessions.
    pub fn list_projects(&self) -> Result<(Vec<Project>, Vec<LiveSession>)> {
        let templates = self.catalog.list()?;
        let live = self.engine.list_active_sessions()?;
        Ok((templates, live))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::fake::{FakeMux, MuxCall};
    use crate::storage::YamlCatalog;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Picks a fixed label and remembers what it was offered.
    struct ScriptedSelector {
        choice: Option<String>,
        offered: RefCell<Vec<Vec<String>>>,
    }

    impl ScriptedSelector {
        fn picking(choice: &str) -> Self {
            Self {
                choice: Some(choice.to_string()),
                offered: RefCell::new(Vec::new()),
            }
        }

        fn cancelling() -> Self {
            Self {
                choice: None,
                offered: RefCell::new(Vec::new()),
            }
        }

        fn offered(&self) -> Vec<Vec<String>> {
            self.offered.borrow().clone()
        }
    }

    impl Selector for ScriptedSelector {
        fn select(&self, items: &[String], _prompt: &str) -> Result<String> {
            self.offered.borrow_mut().push(items.to_vec());
            self.choice.clone().ok_or(Error::Cancelled)
        }
    }

    /// Overwrites the file with fixed contents instead of opening an editor.
    struct WritingEditor(&'static str);

    impl EditorLauncher for WritingEditor {
        fn edit(&self, path: &Path) -> Result<()> {
            std::fs::write(path, self.0)?;
            Ok(())
        }
    }

    struct Fixture {
        _temp: TempDir,
        catalog: YamlCatalog,
        mux: FakeMux,
    }

    impl Fixture {
        fn new(live: &[&str]) -> Self {
            let temp = TempDir::new().unwrap();
            let catalog = YamlCatalog::new(temp.path());
            Self {
                _temp: temp,
                catalog,
                mux: FakeMux::with_live(live),
            }
        }

        fn add(&self, name: &str) -> Project {
            let mut project = Project::new(
                name,
                Template::new("/home/test", vec![Window::new("shell")]),
            );
            self.catalog.save(&mut project).unwrap();
            project
        }

        fn service<'a>(
            &'a self,
            selector: &'a ScriptedSelector,
        ) -> AppService<&'a YamlCatalog, &'a FakeMux, &'a ScriptedSelector> {
            AppService::new(
                &self.catalog,
                SessionEngine::new(&self.mux, false),
                selector,
            )
        }
    }

    fn live(name: &str) -> LiveSession {
        LiveSession::new(SessionName::new(name).unwrap())
    }

    fn project(name: &str) -> Project {
        Project::new(name, Template::new("/tmp", vec![Window::new("shell")]))
    }

    #[test]
    fn test_merge_candidates_order_and_dedup() {
        let mut renamed = project("Beta");
        renamed.template.as_mut().unwrap().name = Some("b-session".to_string());

        let candidates = merge_candidates(
            vec![project("charlie"), renamed, project("alpha")],
            vec![live("scratch"), live("alpha"), live("b-session")],
        );
        let labels: Vec<String> = candidates.iter().map(Candidate::label).collect();
        assert_eq!(
            labels,
            ["(active) scratch", "alpha", "b-session", "charlie"]
        );
    }

    #[test]
    fn test_merge_candidates_case_insensitive() {
        let candidates = merge_candidates(vec![project("beta"), project("Alpha")], Vec::new());
        let labels: Vec<String> = candidates.iter().map(Candidate::label).collect();
        assert_eq!(labels, ["Alpha", "beta"]);
    }

    #[test]
    fn test_create_project_defaults() {
        let fx = Fixture::new(&[]);
        let selector = ScriptedSelector::cancelling();
        let service = fx.service(&selector);

        let project = service
            .create_project(None, Path::new("/work/myproj"))
            .unwrap();
        assert_eq!(project.name, "myproj");
        let template = project.template.as_ref().unwrap();
        assert_eq!(template.root, "/work/myproj");
        assert_eq!(template.windows, vec![Window::new("shell")]);
        assert_eq!(fx.catalog.find("myproj").unwrap().uuid, project.uuid);
    }

    #[test]
    fn test_create_project_duplicate() {
        let fx = Fixture::new(&[]);
        fx.add("foo");
        let selector = ScriptedSelector::cancelling();
        let err = fx
            .service(&selector)
            .create_project(Some("foo"), Path::new("/tmp"))
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
    }

    #[test]
    fn test_open_by_name_prefers_template() {
        let fx = Fixture::new(&["foo"]);
        fx.add("foo");
        let selector = ScriptedSelector::cancelling();

        let opened = fx.service(&selector).open_project(Some("foo")).unwrap();
        assert!(matches!(opened, Opened::Template { .. }));
        assert!(!fx.mux.calls().contains(&MuxCall::ListSessions));
    }

    #[test]
    fn test_open_by_name_falls_back_to_live() {
        let fx = Fixture::new(&["scratch"]);
        let selector = ScriptedSelector::cancelling();

        let opened = fx.service(&selector).open_project(Some("scratch")).unwrap();
        assert_eq!(
            opened,
            Opened::Live {
                session: SessionName::new("scratch").unwrap()
            }
        );
        assert_eq!(
            fx.mux.calls(),
            vec![
                MuxCall::ListSessions,
                MuxCall::HasSession("scratch".to_string()),
                MuxCall::Attach("scratch".to_string()),
            ]
        );
    }

    #[test]
    fn test_open_by_name_unknown() {
        let fx = Fixture::new(&[]);
        let selector = ScriptedSelector::cancelling();
        assert!(matches!(
            fx.service(&selector).open_project(Some("nope")),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_open_selects_live_session() {
        let fx = Fixture::new(&["scratch"]);
        fx.add("foo");
        let selector = ScriptedSelector::picking("(active) scratch");

        let opened = fx.service(&selector).open_project(None).unwrap();
        assert!(matches!(opened, Opened::Live { .. }));
        assert_eq!(selector.offered(), vec![vec!["(active) scratch", "foo"]]);
        assert_eq!(
            fx.mux.calls().last(),
            Some(&MuxCall::Attach("scratch".to_string()))
        );
    }

    #[test]
    fn test_open_selects_template_and_builds_it() {
        let fx = Fixture::new(&[]);
        fx.add("foo");
        let selector = ScriptedSelector::picking("foo");

        fx.service(&selector).open_project(None).unwrap();
        assert!(fx.mux.is_live("foo"));
    }

    #[test]
    fn test_open_with_nothing_to_choose() {
        let fx = Fixture::new(&[]);
        let selector = ScriptedSelector::picking("foo");
        assert!(matches!(
            fx.service(&selector).open_project(None),
            Err(Error::NotFound(_))
        ));
        assert!(selector.offered().is_empty());
    }

    #[test]
    fn test_open_cancelled() {
        let fx = Fixture::new(&[]);
        fx.add("foo");
        let selector = ScriptedSelector::cancelling();
        let err = fx.service(&selector).open_project(None).unwrap_err();
        assert!(err.is_cancelled());
        assert!(!fx.mux.calls().iter().any(|c| matches!(c, MuxCall::HasSession(_))));
    }

    #[test]
    fn test_delete_offers_templates_only() {
        let fx = Fixture::new(&["scratch"]);
        fx.add("foo");
        let selector = ScriptedSelector::picking("foo");

        let deleted = fx.service(&selector).delete_project(None).unwrap();
        assert_eq!(deleted.name, "foo");
        assert_eq!(selector.offered(), vec![vec!["foo"]]);
        assert!(fx.catalog.list().unwrap().is_empty());
    }

    #[test]
    fn test_edit_reloads_and_validates() {
        let fx = Fixture::new(&[]);
        fx.add("foo");
        let selector = ScriptedSelector::cancelling();
        let service = fx.service(&selector);

        let editor = WritingEditor(
            "name: foo\nversion: 1\ntemplate:\n  root: /srv\n  windows:\n    - name: main\n",
        );
        let (project, path) = service.edit_project(Some("foo"), &editor).unwrap();
        assert_eq!(project.template.as_ref().unwrap().root, "/srv");
        assert!(path.ends_with("template.yaml"));

        let broken = WritingEditor("name: foo\ntemplate:\n  root: /srv\n  windows: []\n");
        assert!(matches!(
            service.edit_project(Some("foo"), &broken),
            Err(Error::InvalidTemplateArgs(_))
        ));
    }

    #[test]
    fn test_kill_by_name() {
        let fx = Fixture::new(&["a", "b"]);
        let selector = ScriptedSelector::cancelling();
        let service = fx.service(&selector);

        let killed = service.kill_session(Some("b")).unwrap();
        assert_eq!(killed.name.as_str(), "b");
        assert!(!fx.mux.is_live("b"));
        assert!(matches!(
            service.kill_session(Some("zzz")),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_kill_selects_live_only() {
        let fx = Fixture::new(&["a"]);
        fx.add("foo");
        let selector = ScriptedSelector::picking("(active) a");

        fx.service(&selector).kill_session(None).unwrap();
        assert_eq!(selector.offered(), vec![vec!["(active) a"]]);
        assert!(!fx.mux.is_live("a"));
    }

    #[test]
    fn test_list_projects() {
        let fx = Fixture::new(&["x"]);
        fx.add("foo");
        let selector = ScriptedSelector::cancelling();
        let (templates, live) = fx.service(&selector).list_projects().unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(live.len(), 1);
    }
}
