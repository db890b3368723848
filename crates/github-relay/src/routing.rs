//! Repository name to delivery target routing.
//!
//! A route pattern is either an exact repository full name (`owner/repo`) or
//! a glob where `*` matches any run of characters, including `/`.

use regex::Regex;

/// Compiled route pattern.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    raw: String,
    wildcard: Option<Regex>,
}

impl RoutePattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let wildcard = if pattern.contains('*') {
            let body = pattern
                .split('*')
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(".*");
            Some(Regex::new(&format!("^{body}$"))?)
        } else {
            None
        };

        Ok(Self {
            raw: pattern.to_string(),
            wildcard,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, repository: &str) -> bool {
        match &self.wildcard {
            Some(regex) => regex.is_match(repository),
            None => self.raw == repository,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Route {
    pub pattern: RoutePattern,
    pub targets: Vec<String>,
}

/// Ordered list of routes for one delivery family.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Targets of every route matching `repository`, first occurrence wins on
    /// duplicates.
    pub fn targets_for(&self, repository: &str) -> Vec<String> {
        let mut targets: Vec<String> = Vec::new();
        for route in self.routes.iter().filter(|r| r.pattern.matches(repository)) {
            for target in &route.targets {
                if !targets.contains(target) {
                    targets.push(target.clone());
                }
            }
        }
        targets
    }
}

/// Routes for both delivery families.
#[derive(Debug, Clone, Default)]
pub struct Routes {
    /// irker targets such as `ircs://irc.libera.chat/#channel`.
    pub irc: RouteTable,
    /// Discord webhook URLs.
    pub discord: RouteTable,
}
