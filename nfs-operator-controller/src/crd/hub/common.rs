use serde::{Deserialize, Serialize};
use schemars::JsonSchema;

use crate::crd::v1alpha1;


#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
pub struct NfsSpec {
    pub enable: bool,
}

impl From<v1alpha1::common::NfsSpec> for NfsSpec {
    fn from(spec: v1alpha1::common::NfsSpec) -> Self {
        NfsSpec {
            enable: spec.enable,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
pub struct NetworkSpec {
    pub host_network: bool,
}

impl From<v1alpha1::common::NetworkSpec> for NetworkSpec {
    fn from(spec: v1alpha1::common::NetworkSpec) -> Self {
        NetworkSpec {
            host_network: spec.host_network,
        }
    }
}
