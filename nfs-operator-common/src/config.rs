// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use std::path::Path;
use std::time::Duration;
use serde::{Serialize, Deserialize};
use figment::{Figment, Error, providers::{Format, Json, Toml, Yaml, Env, Serialized}};

use crate::constant::ENV_PREFIX;

#[derive(Debug, Deserialize, Serialize, Clone)]
#[allow(unused)]
#[derive(Default)]
pub struct AppConfig {
    #[serde(default)]
    pub controller: ControllerConfig,
}


#[derive(Debug, Deserialize, Serialize, Clone)]
#[allow(unused)]
pub struct ControllerConfig {
    /// Seconds between periodic resyncs of a healthy StorageCluster
    #[serde(default)]
    pub requeue_interval_secs: u64,
    /// Seconds to wait before retrying after a transient error
    #[serde(default)]
    pub error_requeue_secs: u64,
    /// Seconds to wait before checking again on a resource that is still deleting
    #[serde(default)]
    pub deletion_poll_secs: u64,
    /// Seconds to wait before retrying when a resource that should exist is terminating
    #[serde(default)]
    pub pending_deletion_requeue_secs: u64,
    #[serde(default)]
    pub priority_class_name: String,
    #[serde(default)]
    pub storage_node_label: String,
    #[serde(default)]
    pub storage_node_taint: String,
    #[serde(default)]
    pub default_failure_domain: String,
    #[serde(default)]
    pub default_replica_size: u32,
}

impl ControllerConfig {
    pub fn requeue_interval(&self) -> Duration {
        Duration::from_secs(self.requeue_interval_secs)
    }

    pub fn error_requeue(&self) -> Duration {
        Duration::from_secs(self.error_requeue_secs)
    }

    pub fn deletion_poll(&self) -> Duration {
        Duration::from_secs(self.deletion_poll_secs)
    }

    pub fn pending_deletion_requeue(&self) -> Duration {
        Duration::from_secs(self.pending_deletion_requeue_secs)
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig {
            requeue_interval_secs: 30,
            error_requeue_secs: 30,
            deletion_poll_secs: 5,
            pending_deletion_requeue_secs: 10,
            priority_class_name: "system-cluster-critical".to_string(),
            storage_node_label: "nfs-operator.io/storage-node".to_string(),
            storage_node_taint: "node.nfs-operator.io/storage".to_string(),
            default_failure_domain: "host".to_string(),
            default_replica_size: 3,
        }
    }
}

pub struct AppConfigBuilder {
    figment: Figment,
}

impl AppConfigBuilder {
    pub fn with_file(&mut self, path: &str) -> &mut Self {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();

        self.figment = match extension {
            "json" => self.figment.clone().merge(Json::file(path)),
            "yaml" | "yml" => self.figment.clone().merge(Yaml::file(path)),
            "toml" => self.figment.clone().merge(Toml::file(path)),
            _ => self.figment.clone(),
        };
        self
    }

    pub fn with_optional_file(&mut self, path: Option<&str>) -> &mut Self {
        match path {
            Some(path) => self.with_file(path),
            None => self,
        }
    }

    pub fn with_env(&mut self) -> &mut Self {
        self.figment = self.figment.clone().merge(Env::prefixed(&format!("{}__", ENV_PREFIX)).split("__"));
        self
    }

    pub fn build(&self) -> Result<AppConfig, Error> {
        self.figment.extract()
    }
}

impl Default for AppConfigBuilder {
    fn default() -> Self {
        AppConfigBuilder {
            figment: Figment::from(Serialized::defaults(AppConfig::default()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults() {
        let config = AppConfigBuilder::default().build().unwrap();

        assert_eq!(config.controller.requeue_interval(), Duration::from_secs(30));
        assert_eq!(config.controller.deletion_poll(), Duration::from_secs(5));
        assert_eq!(config.controller.default_failure_domain, "host");
        assert_eq!(config.controller.default_replica_size, 3);
    }

    #[test]
    fn test_env_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.set_env("NFS_OPERATOR__CONTROLLER__DEFAULT_REPLICA_SIZE", "2");
            jail.set_env("NFS_OPERATOR__CONTROLLER__PRIORITY_CLASS_NAME", "storage-critical");

            let config = AppConfigBuilder::default().with_env().build()?;

            assert_eq!(config.controller.default_replica_size, 2);
            assert_eq!(config.controller.priority_class_name, "storage-critical");
            assert_eq!(config.controller.deletion_poll_secs, 5);
            Ok(())
        });
    }

    #[test]
    fn test_file_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file("config.yaml", "controller:\n  deletion_poll_secs: 2\n  error_requeue_secs: 60\n")?;
            jail.set_env("NFS_OPERATOR__CONTROLLER__ERROR_REQUEUE_SECS", "15");

            let config = AppConfigBuilder::default()
                .with_optional_file(Some("config.yaml"))
                .with_env()
                .build()?;

            assert_eq!(config.controller.deletion_poll_secs, 2);
            assert_eq!(config.controller.error_requeue_secs, 15);
            Ok(())
        });
    }
}
