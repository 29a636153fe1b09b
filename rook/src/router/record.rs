//! Route records: the declarative input of a route table.

use super::loader::ComponentLoader;

/// Binds a path pattern and a name to a deferred view.
#[derive(Debug, Clone)]
pub struct RouteRecord {
    pub path: String,
    pub name: String,
    pub loader: ComponentLoader,
}

impl RouteRecord {
    pub fn new(path: impl Into<String>, name: impl Into<String>, loader: ComponentLoader) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            loader,
        }
    }
}

/// Declare a list of route records.
///
/// # Example
/// ```ignore
/// use rook::routes;
///
/// let records = routes! {
///     "/" => "Chess": chess_loader(),
///     "/games/:id" => "Game": game_loader(),
/// };
/// ```
#[macro_export]
macro_rules! routes {
    ($($path:literal => $name:literal : $loader:expr),* $(,)?) => {
        vec![
            $($crate::router::RouteRecord::new($path, $name, $loader)),*
        ]
    };
}
