//! Route table and the authentication guard.
//!
//! The guard is a pure function of the target route and whether a token is
//! present. [`Router`] wires it to the live [`CredentialStore`] and follows
//! redirects until a route is allowed.

use tracing::{debug, instrument};

use crate::Result;
use crate::error::InvalidInputError;
use crate::store::CredentialStore;

/// Entry route for signing in.
pub const LOGIN_PATH: &str = "/login";
/// Entry route for creating an account.
pub const REGISTER_PATH: &str = "/register";
/// Where authenticated users land.
pub const LANDING_PATH: &str = "/dashboard";

/// Upper bound on redirects followed for a single navigation.
const MAX_REDIRECTS: usize = 8;

/// A static route definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub path: String,
    pub name: String,
    pub requires_auth: bool,
    /// If set, the route is an alias that immediately moves to this path.
    pub redirect: Option<String>,
}

impl RouteDescriptor {
    /// A route anyone may visit.
    pub fn public(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            requires_auth: false,
            redirect: None,
        }
    }

    /// A route that needs a session.
    pub fn protected(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            requires_auth: true,
            ..Self::public(path, name)
        }
    }

    /// A route that forwards to another path.
    pub fn alias(
        path: impl Into<String>,
        name: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            redirect: Some(target.into()),
            ..Self::public(path, name)
        }
    }
}

/// Ordered set of routes plus the distinguished entry and landing paths.
#[derive(Clone, Debug)]
pub struct RouteTable {
    routes: Vec<RouteDescriptor>,
    login_path: String,
    entry_paths: Vec<String>,
    landing_path: String,
}

impl RouteTable {
    /// Create a table.
    ///
    /// `entry_paths` are the routes an authenticated user is bounced away
    /// from; `login_path` should be one of them.
    pub fn new(
        routes: Vec<RouteDescriptor>,
        login_path: impl Into<String>,
        entry_paths: Vec<String>,
        landing_path: impl Into<String>,
    ) -> Self {
        Self {
            routes,
            login_path: login_path.into(),
            entry_paths,
            landing_path: landing_path.into(),
        }
    }

    /// Find the route registered for `path`.
    pub fn resolve(&self, path: &str) -> Option<&RouteDescriptor> {
        let path = normalize(path);
        self.routes.iter().find(|r| r.path == path)
    }

    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn landing_path(&self) -> &str {
        &self.landing_path
    }

    /// Returns true for the login and registration routes.
    pub fn is_entry(&self, path: &str) -> bool {
        let path = normalize(path);
        self.entry_paths.iter().any(|p| p == path)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(
            vec![
                RouteDescriptor::alias("/", "home", LOGIN_PATH),
                RouteDescriptor::public(LOGIN_PATH, "login"),
                RouteDescriptor::public(REGISTER_PATH, "register"),
                RouteDescriptor::protected(LANDING_PATH, "dashboard"),
                RouteDescriptor::protected("/documents", "documents"),
                RouteDescriptor::protected("/chat", "chat"),
                RouteDescriptor::protected("/inspiration", "inspiration"),
            ],
            LOGIN_PATH,
            vec![LOGIN_PATH.to_string(), REGISTER_PATH.to_string()],
            LANDING_PATH,
        )
    }
}

/// Result of evaluating the guard for one transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Complete the transition as requested.
    Allow,
    /// Abort the transition and go to this path instead.
    Redirect(String),
}

/// Decides, per navigation, whether the target route may be entered.
#[derive(Clone, Debug)]
pub struct NavigationGuard {
    login_path: String,
    landing_path: String,
    entry_paths: Vec<String>,
}

impl NavigationGuard {
    /// Build a guard for the entry and landing routes of `table`.
    pub fn for_table(table: &RouteTable) -> Self {
        Self {
            login_path: table.login_path.clone(),
            landing_path: table.landing_path.clone(),
            entry_paths: table.entry_paths.clone(),
        }
    }

    /// Evaluate the rules in order:
    ///
    /// 1. protected target without a token goes to login;
    /// 2. entry target with a token goes to the landing route;
    /// 3. anything else is allowed.
    pub fn evaluate(&self, target: &RouteDescriptor, authenticated: bool) -> GuardOutcome {
        if target.requires_auth && !authenticated {
            GuardOutcome::Redirect(self.login_path.clone())
        } else if authenticated && self.entry_paths.iter().any(|p| *p == target.path) {
            GuardOutcome::Redirect(self.landing_path.clone())
        } else {
            GuardOutcome::Allow
        }
    }
}

/// A completed navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigation {
    /// The path that was asked for.
    pub requested: String,
    /// The path the user ends up on.
    pub path: String,
    /// The route registered for `path`, if any.
    pub route: Option<RouteDescriptor>,
    /// The guard's decision on the first non-alias route visited.
    pub outcome: GuardOutcome,
}

impl Navigation {
    pub fn was_redirected(&self) -> bool {
        self.requested != self.path
    }
}

/// Applies the guard to route changes using the live session state.
#[derive(Clone, Debug)]
pub struct Router {
    table: RouteTable,
    guard: NavigationGuard,
    store: CredentialStore,
}

impl Router {
    /// Create a router over the default route table.
    pub fn new(store: CredentialStore) -> Self {
        Self::with_table(RouteTable::default(), store)
    }

    /// Create a router over a custom route table.
    pub fn with_table(table: RouteTable, store: CredentialStore) -> Self {
        let guard = NavigationGuard::for_table(&table);
        Self {
            table,
            guard,
            store,
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Evaluate the guard for a single route without following redirects.
    pub fn check(&self, target: &RouteDescriptor) -> GuardOutcome {
        self.guard.evaluate(target, self.store.is_authenticated())
    }

    /// Resolve `path`, following alias and guard redirects.
    ///
    /// Paths with no registered route are treated as public.
    ///
    /// # Errors
    ///
    /// Returns an error if redirects do not settle, which means the table
    /// is misconfigured.
    #[instrument(skip(self))]
    pub fn navigate(&self, path: &str) -> Result<Navigation> {
        let requested = normalize(path).to_string();
        let mut current = requested.clone();
        let mut first = None;

        for _ in 0..MAX_REDIRECTS {
            let route = self.table.resolve(&current);

            if let Some(target) = route.and_then(|r| r.redirect.as_deref()) {
                debug!(from = %current, to = target, "Following route alias");
                current = normalize(target).to_string();
                continue;
            }

            let outcome = match route {
                Some(route) => self.check(route),
                None => self.check(&RouteDescriptor::public(current.as_str(), "")),
            };
            let first_outcome = first.get_or_insert_with(|| outcome.clone()).clone();

            match outcome {
                GuardOutcome::Allow => {
                    return Ok(Navigation {
                        requested,
                        route: route.cloned(),
                        path: current,
                        outcome: first_outcome,
                    });
                }
                GuardOutcome::Redirect(target) => {
                    debug!(from = %current, to = %target, "Guard redirect");
                    current = normalize(&target).to_string();
                }
            }
        }

        Err(InvalidInputError::Route {
            path: requested,
            reason: format!("more than {} redirects", MAX_REDIRECTS),
        }
        .into())
    }
}

/// Strip query, fragment and trailing slash.
fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}
