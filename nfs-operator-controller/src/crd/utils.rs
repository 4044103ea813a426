use kube::CustomResourceExt;
use kube::core::crd::merge_crds;

use crate::crd::v1alpha1::storagecluster::StorageCluster as V1Alpha1StorageCluster;
use crate::error::{ControllerError, Result};


/// Render the CRDs served by the operator as a multi-document YAML string
pub fn render_crds() -> Result<String> {
    let crds = vec![
        merge_crds(vec![V1Alpha1StorageCluster::crd()], "v1alpha1")
            .map_err(|e| ControllerError::UnknownError(format!("failed to merge StorageCluster CRDs: {}", e)))?,
    ];

    crds.iter().try_fold(String::new(), |mut out, crd| {
        out.push_str("---\n");
        out.push_str(
            &serde_norway::to_string(crd).map_err(|e| ControllerError::UnknownError(e.to_string()))?
        );
        Ok(out)
    })
}

/// Generate the CRDs for the operator
pub fn generate_crds() -> Result<()> {
    print!("{}", render_crds()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_crds() {
        let rendered = render_crds().unwrap();

        assert!(rendered.starts_with("---\n"));
        assert!(rendered.contains("storageclusters.nfs-operator.io"));
        assert!(rendered.contains("v1alpha1"));
        assert!(!rendered.contains("ceph.rook.io"));
    }
}
