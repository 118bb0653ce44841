//! Project catalog
//!
//! Static gallery content. The engine only needs ids to validate
//! open-requests; titles and imagery are for the presentation layer.

use serde::{Deserialize, Serialize};

/// Identifier of a gallery project (e.g. `"x-heal"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProjectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A gallery entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub hero_image: &'static str,
}

const SELECTED_WORKS: [Project; 3] = [
    Project {
        id: "x-heal",
        title: "X-Heal",
        description: "Dual-sensor IoT platform for accurate at-home recovery and remote clinician monitoring.",
        hero_image: "/images/X-Heal_Hero.png",
    },
    Project {
        id: "prelo",
        title: "Prelo",
        description: "Know what you're ordering. When menus don't explain enough.",
        hero_image: "/images/Prelo_hero.png",
    },
    Project {
        id: "mushroommate",
        title: "MushRoommate",
        description: "Sustainable home cultivation for affordable, year-round urban mushroom growing.",
        hero_image: "/images/mushroomate_hero.png",
    },
];

/// Ordered list of gallery projects
#[derive(Debug, Clone)]
pub struct ProjectCatalog {
    projects: Vec<Project>,
}

impl ProjectCatalog {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Position of a project in gallery order
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.projects.iter().position(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

impl Default for ProjectCatalog {
    fn default() -> Self {
        Self::new(SELECTED_WORKS.to_vec())
    }
}
