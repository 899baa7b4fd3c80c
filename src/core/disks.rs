use crate::domain::model::DiskInfo;
use crate::utils::error::Result;
use sysinfo::Disks;

pub fn list_disks() -> Vec<DiskInfo> {
    let disks = Disks::new_with_refreshed_list();

    let mut list: Vec<DiskInfo> = disks
        .list()
        .iter()
        .map(|disk| DiskInfo {
            name: disk.name().to_string_lossy().into_owned(),
            mount_point: disk.mount_point().to_path_buf(),
            file_system: disk.file_system().to_string_lossy().into_owned(),
            total: disk.total_space(),
            available: disk.available_space(),
        })
        .collect();

    list.sort_by(|a, b| a.mount_point.cmp(&b.mount_point));
    tracing::debug!("Discovered {} mounted disks", list.len());
    list
}

/// 找出包含 `path` 的磁碟 (掛載點為最長前綴者)
pub fn disk_for(path: &str) -> Result<Option<DiskInfo>> {
    let target = super::paths::abspath(path)?;
    Ok(pick_disk(list_disks(), &target))
}

fn pick_disk(disks: Vec<DiskInfo>, target: &std::path::Path) -> Option<DiskInfo> {
    disks
        .into_iter()
        .filter(|disk| target.starts_with(&disk.mount_point))
        .max_by_key(|disk| disk.mount_point.components().count())
}
