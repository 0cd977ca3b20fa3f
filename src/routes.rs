//! Navigation targets under the `characters` base path.

use std::fmt;

use crate::types::CharacterId;

/// Path segment every route lives under.
pub const BASE_PATH: &str = "characters";

/// A resolved navigation target.
///
/// `:id` segments are kept raw; the detail and edit views decide whether they
/// name a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/characters`, the landing page.
    List,
    /// `/characters/new`
    New,
    /// `/characters/:id`
    Detail(String),
    /// `/characters/:id/edit`
    Edit(String),
}

impl Route {
    /// Detail route for `id`.
    pub fn detail(id: CharacterId) -> Self {
        Route::Detail(id.to_string())
    }

    /// Edit route for `id`.
    pub fn edit(id: CharacterId) -> Self {
        Route::Edit(id.to_string())
    }

    /// Matches a path; anything unmatched redirects to the list.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [base] if *base == BASE_PATH => Route::List,
            [base, "new"] if *base == BASE_PATH => Route::New,
            [base, id] if *base == BASE_PATH => Route::Detail((*id).to_string()),
            [base, id, "edit"] if *base == BASE_PATH => Route::Edit((*id).to_string()),
            _ => Route::List,
        }
    }

    /// Absolute path for the route.
    pub fn path(&self) -> String {
        match self {
            Route::List => format!("/{BASE_PATH}"),
            Route::New => format!("/{BASE_PATH}/new"),
            Route::Detail(id) => format!("/{BASE_PATH}/{id}"),
            Route::Edit(id) => format!("/{BASE_PATH}/{id}/edit"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
