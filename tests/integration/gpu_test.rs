use chatline::core::status::{GpuDescriptor, GpuMetricStrategy, GpuVendor};
use chatline::platform::gpu::{pci, AmdGpuStrategy, DrmTree};
use std::fs;
use tempfile::TempDir;

fn fake_card(root: &std::path::Path, card: &str, slot: &str) -> std::path::PathBuf {
    let device = root.join(card).join("device");
    fs::create_dir_all(&device).unwrap();
    fs::write(
        device.join("uevent"),
        format!("DRIVER=amdgpu\nPCI_SLOT_NAME={}\n", slot),
    )
    .unwrap();
    device
}

#[test]
fn test_lspci_entries_map_to_drm_cards() {
    let dir = TempDir::new().unwrap();
    fake_card(dir.path(), "card0", "0000:00:02.0");
    fake_card(dir.path(), "card1", "0000:28:00.0");
    let drm = DrmTree::new(dir.path());

    let lspci = "\
00:02.0 VGA compatible controller [0300]: Intel Corporation Alder Lake-S GT1 [UHD Graphics 770] [8086:4690] (rev 0c)
28:00.0 VGA compatible controller [0300]: Advanced Micro Devices, Inc. [AMD/ATI] Navi 21 [1002:73a5] (rev c0)
2a:00.0 3D controller [0302]: NVIDIA Corporation GA107M [10de:25a2] (rev a1)
";

    let mapped: Vec<(String, Option<String>)> = pci::parse_lspci(lspci)
        .into_iter()
        .map(|gpu| {
            let card = drm.card_for_bus(&gpu.bus_id);
            (gpu.bus_id, card)
        })
        .collect();

    assert_eq!(
        mapped,
        vec![
            ("00:02.0".to_string(), Some("card0".to_string())),
            ("28:00.0".to_string(), Some("card1".to_string())),
            ("2a:00.0".to_string(), None),
        ]
    );
}

#[test]
fn test_amd_collector_without_device_node_never_fails() {
    let strategy = AmdGpuStrategy::new(DrmTree::new("/nonexistent/chatline/drm"));
    let gpu = GpuDescriptor {
        bus_id: "28:00.0".to_string(),
        vendor: GpuVendor::Amd,
        display_name: "Navi 21".to_string(),
        device_handle: None,
    };

    assert_eq!(strategy.temperature_celsius(&gpu), 0.0);
    assert_eq!(strategy.vram_used_gib(&gpu), 0.0);
    assert_eq!(strategy.vram_total_gib(&gpu), 0.0);
    assert!(strategy.usage_percent(&gpu) >= 0.0);
}

#[test]
fn test_amd_counters_from_card_directory() {
    let dir = TempDir::new().unwrap();
    let device = fake_card(dir.path(), "card1", "0000:28:00.0");
    fs::write(device.join("gpu_busy_percent"), "63\n").unwrap();
    fs::create_dir_all(device.join("hwmon").join("hwmon2")).unwrap();
    fs::write(device.join("hwmon").join("hwmon2").join("temp1_input"), "48500\n").unwrap();

    let drm = DrmTree::new(dir.path());
    let gpu = GpuDescriptor {
        bus_id: "28:00.0".to_string(),
        vendor: GpuVendor::Amd,
        display_name: "Navi 21".to_string(),
        device_handle: drm.card_for_bus("28:00.0"),
    };
    let strategy = AmdGpuStrategy::new(drm);

    assert_eq!(strategy.usage_percent(&gpu), 63.0);
    assert_eq!(strategy.temperature_celsius(&gpu), 48.5);
    assert_eq!(strategy.vram_total_gib(&gpu), 0.0);
}
