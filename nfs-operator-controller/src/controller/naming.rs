use nfs_operator_common::utils::short_hash;

// Kubernetes object names used as DNS labels (e.g. Services) are capped at 63 characters
pub const MAX_NAME_LENGTH: usize = 63;
const HASH_SUFFIX_LENGTH: usize = 8;


/// Derive the name of a managed resource from its parent and kind tag
///
/// The same parent and tag always produce the same name. Names that would exceed
/// [`MAX_NAME_LENGTH`] are truncated and suffixed with a digest of the full name,
/// which keeps them unique per parent.
///
/// # Arguments
/// * `parent` - The name of the parent StorageCluster
/// * `tag` - The kind tag of the managed resource, e.g. `cephnfs`
pub fn derive_name(parent: &str, tag: &str) -> String {
    let name = format!("{}-{}", parent, tag);

    if name.len() <= MAX_NAME_LENGTH {
        return name;
    }

    let digest = short_hash(&name, HASH_SUFFIX_LENGTH);
    let keep = MAX_NAME_LENGTH - HASH_SUFFIX_LENGTH - 1;
    let prefix: String = name.chars().take(keep).collect();

    format!("{}-{}", prefix.trim_end_matches('-'), digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_names_are_joined() {
        assert_eq!(derive_name("ocsinit", "cephnfs"), "ocsinit-cephnfs");
        assert_eq!(derive_name("ocsinit", "cephnfs-service"), "ocsinit-cephnfs-service");
    }

    #[test]
    fn test_names_are_deterministic() {
        let parent = "a".repeat(80);

        assert_eq!(derive_name(&parent, "cephnfs"), derive_name(&parent, "cephnfs"));
        assert_eq!(derive_name("ocsinit", "cephnfs"), derive_name("ocsinit", "cephnfs"));
    }

    #[test]
    fn test_long_names_are_truncated_and_unique() {
        let parent = "storage-cluster-with-a-really-long-name-that-keeps-going";

        let service = derive_name(parent, "cephnfs-service");
        let pool = derive_name(parent, "cephnfs-builtin-pool");

        assert!(service.len() <= MAX_NAME_LENGTH);
        assert!(pool.len() <= MAX_NAME_LENGTH);
        assert_ne!(service, pool);
        assert!(!service.contains("--"));
    }
}
