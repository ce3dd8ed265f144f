use chatline::core::status::{
    resolve_primary, GpuDescriptor, GpuProbes, GpuVendor, OffloadPreference, PrimaryGpuCache,
};
use std::collections::HashMap;
use std::sync::Arc;

fn gpu(bus_id: &str, vendor: GpuVendor, card: Option<&str>) -> GpuDescriptor {
    GpuDescriptor {
        bus_id: bus_id.to_string(),
        vendor,
        display_name: format!("{} GPU", vendor),
        device_handle: card.map(str::to_string),
    }
}

/// Canned probe answers keyed by what the real probes would see
#[derive(Default, Clone)]
struct FakeProbes {
    gpus: Vec<GpuDescriptor>,
    display_bus: Option<String>,
    renderers: HashMap<&'static str, String>,
    usage: HashMap<String, f64>,
}

impl FakeProbes {
    fn with_usage(mut self, bus_id: &str, usage: f64) -> Self {
        self.usage.insert(bus_id.to_string(), usage);
        self
    }
}

impl GpuProbes for FakeProbes {
    fn enumerate(&self) -> Vec<GpuDescriptor> {
        self.gpus.clone()
    }

    fn primary_display_bus_id(&self) -> Option<String> {
        self.display_bus.clone()
    }

    fn renderer(&self, offload: OffloadPreference) -> Option<String> {
        self.renderers.get(offload.dri_prime()).cloned()
    }

    fn usage(&self, gpu: &GpuDescriptor) -> f64 {
        self.usage.get(&gpu.bus_id).copied().unwrap_or(0.0)
    }
}

fn hybrid_laptop() -> FakeProbes {
    FakeProbes {
        gpus: vec![
            gpu("00:02.0", GpuVendor::Intel, Some("card0")),
            gpu("01:00.0", GpuVendor::Nvidia, Some("card1")),
            gpu("28:00.0", GpuVendor::Amd, None),
        ],
        ..Default::default()
    }
}

#[test]
fn test_no_gpus_resolves_to_none_and_is_not_cached() {
    let cache = PrimaryGpuCache::new();
    assert!(resolve_primary(&FakeProbes::default(), &cache).is_none());
    assert!(cache.get().is_none());
}

#[test]
fn test_display_affinity_needs_usage_confirmation() {
    let mut probes = hybrid_laptop();
    probes.display_bus = Some("01:00.0".to_string());

    // Idle display GPU falls through to the bus fallback
    let selected = resolve_primary(&probes, &PrimaryGpuCache::new()).unwrap();
    assert_eq!(selected.bus_id, "28:00.0");

    let probes = probes.with_usage("01:00.0", 12.0);
    let selected = resolve_primary(&probes, &PrimaryGpuCache::new()).unwrap();
    assert_eq!(selected.bus_id, "01:00.0");
}

#[test]
fn test_rendering_affinity_tries_discrete_first() {
    let mut probes = hybrid_laptop()
        .with_usage("00:02.0", 3.0)
        .with_usage("01:00.0", 8.0);
    probes
        .renderers
        .insert("1", "opengl renderer string: nvidia geforce rtx 3050".to_string());
    probes
        .renderers
        .insert("0", "opengl renderer string: mesa intel(r) uhd graphics".to_string());

    let selected = resolve_primary(&probes, &PrimaryGpuCache::new()).unwrap();
    assert_eq!(selected.vendor, GpuVendor::Nvidia);
}

#[test]
fn test_unconfirmed_renderer_falls_to_first_usage() {
    let mut probes = hybrid_laptop().with_usage("00:02.0", 5.0);
    probes
        .renderers
        .insert("1", "opengl renderer string: nvidia geforce rtx 3050".to_string());

    let selected = resolve_primary(&probes, &PrimaryGpuCache::new()).unwrap();
    assert_eq!(selected.bus_id, "00:02.0");
}

#[test]
fn test_first_usage_skips_gpus_without_device_node() {
    let probes = hybrid_laptop().with_usage("28:00.0", 50.0).with_usage("01:00.0", 1.0);

    let selected = resolve_primary(&probes, &PrimaryGpuCache::new()).unwrap();
    assert_eq!(selected.bus_id, "01:00.0");
}

#[test]
fn test_falls_back_to_first_candidate() {
    let probes = FakeProbes {
        gpus: vec![
            gpu("03:00.0", GpuVendor::Amd, None),
            gpu("04:00.0", GpuVendor::Amd, None),
        ],
        ..Default::default()
    };

    let selected = resolve_primary(&probes, &PrimaryGpuCache::new()).unwrap();
    assert_eq!(selected.bus_id, "03:00.0");
}

#[test]
fn test_resolution_is_deterministic_and_a_member() {
    let probes = hybrid_laptop().with_usage("00:02.0", 2.0);

    let first = resolve_primary(&probes, &PrimaryGpuCache::new()).unwrap();
    let second = resolve_primary(&probes, &PrimaryGpuCache::new()).unwrap();

    assert_eq!(first, second);
    assert!(probes.enumerate().contains(&*first));
}

#[test]
fn test_cache_survives_changing_probes_until_invalidated() {
    let cache = PrimaryGpuCache::new();

    let before = resolve_primary(&hybrid_laptop().with_usage("00:02.0", 2.0), &cache).unwrap();

    let changed = hybrid_laptop().with_usage("01:00.0", 90.0);
    let cached = resolve_primary(&changed, &cache).unwrap();
    assert!(Arc::ptr_eq(&before, &cached));

    cache.invalidate();
    let after = resolve_primary(&changed, &cache).unwrap();
    assert_eq!(after.bus_id, "01:00.0");
}
