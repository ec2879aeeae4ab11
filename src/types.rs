/// Path variables captured while matching a route, e.g. the route pattern
/// `/users/{id}` against the path `/users/42` captures `{ "id": "42" }`.
///
/// Entries keep the order of the capture segments in the pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(Vec<(String, String)>);

impl RouteParams {
    pub fn new() -> RouteParams {
        RouteParams(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> RouteParams {
        RouteParams(Vec::with_capacity(capacity))
    }

    pub fn set<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) {
        self.0.push((name.into(), value.into()));
    }

    /// The value captured under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(name, value)` pairs in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}
