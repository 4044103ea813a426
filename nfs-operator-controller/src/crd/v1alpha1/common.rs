use serde::{Deserialize, Serialize};
use schemars::JsonSchema;


#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct NfsSpec {
    /// Whether the NFS exporter and its supporting resources should be deployed
    pub enable: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkSpec {
    /// Whether the Ceph daemons run on the host network
    pub host_network: bool,
}
