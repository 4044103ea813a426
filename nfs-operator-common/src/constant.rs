// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

pub static ENV_PREFIX: &str = "NFS_OPERATOR";
pub static CONFIG_FILE_ENV: &str = "NFS_OPERATOR_CONFIG";
