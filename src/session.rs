use crate::azure::{Project, Requirement};
use crate::config::SessionConfig;

/// Who is signed in, whether they may use the import view, and the
/// destination projects known for them. Passed into `App` explicitly.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub user_id: String,
    pub org_id: String,
    pub authorized: bool,
    pub projects: Vec<Project>,
}

impl Session {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            user_id: config.user_id.clone(),
            org_id: config.org_id.clone(),
            authorized: config.azure_devops_enabled,
            projects: Vec::new(),
        }
    }

    /// Requirement list of the named project, empty when unknown
    pub fn requirements_for(&self, project_name: &str) -> Vec<Requirement> {
        self.projects
            .iter()
            .find(|p| p.project_name == project_name)
            .map(|p| p.requirements.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(name: &str, reqs: &[&str]) -> Project {
        Project {
            project_id: serde_json::json!(name),
            project_name: name.to_string(),
            requirements: reqs
                .iter()
                .map(|r| Requirement {
                    requirement_id: serde_json::json!(r),
                    requirement_name: r.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_requirements_for_known_and_unknown() {
        let session = Session {
            projects: vec![project("A", &["a1", "a2"]), project("B", &[])],
            ..Session::default()
        };
        let names: Vec<_> = session
            .requirements_for("A")
            .into_iter()
            .map(|r| r.requirement_name)
            .collect();
        assert_eq!(names, vec!["a1", "a2"]);
        assert!(session.requirements_for("B").is_empty());
        assert!(session.requirements_for("missing").is_empty());
    }

    #[test]
    fn test_from_config() {
        let session = Session::from_config(&SessionConfig {
            user_id: "u".into(),
            org_id: "o".into(),
            azure_devops_enabled: true,
        });
        assert!(session.authorized);
        assert_eq!(session.user_id, "u");
        assert!(session.projects.is_empty());
    }
}
