/// Settings shared across the server wiring.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub backend_url: String,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(backend_url: String) -> Self {
        Self { backend_url }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_args() {
        let args = GlobalArgs::new("http://localhost:3001".to_string());
        assert_eq!(args.backend_url, "http://localhost:3001");
    }
}
