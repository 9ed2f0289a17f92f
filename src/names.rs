/// Top-level domain of every name held by the registry.
pub const KDA_EXTENSION: &str = ".kda";

/// Normalize a registry name: lower-case it and make sure it ends in `.kda`.
///
/// Idempotent, and `"EXAMPLE.KDA"` normalizes the same as `"example"`.
pub fn ensure_kda_extension(name: &str) -> String {
    let lower = name.to_lowercase();
    if lower.ends_with(KDA_EXTENSION) {
        lower
    } else {
        format!("{lower}{KDA_EXTENSION}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_extension() {
        assert_eq!(ensure_kda_extension("example"), "example.kda");
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(ensure_kda_extension("EXAMPLE.KDA"), "example.kda");
        assert_eq!(ensure_kda_extension("Example"), ensure_kda_extension("example.kda"));
    }

    #[test]
    fn idempotent() {
        for name in ["example", "example.kda", "Mixed.Case", "sub.domain.kda"] {
            let once = ensure_kda_extension(name);
            assert_eq!(ensure_kda_extension(&once), once);
        }
    }
}
