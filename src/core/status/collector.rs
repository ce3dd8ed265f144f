use std::sync::Arc;

use sysinfo::{Components, CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};

use crate::core::config::SystemStatsConfig;

use super::gpu::{GpuDescriptor, GpuMetricStrategy};
use super::metrics::{bytes_to_gib, MetricsSnapshot};

/// Sensor chips that report the CPU package temperature
const CPU_SENSOR_CHIPS: &[&str] = &["coretemp", "k10temp", "zenpower"];

/// Labels of the package/die reading on those chips
const CPU_SENSOR_LABELS: &[&str] = &["package", "tctl", "tdie"];

/// Anything that can produce a metrics snapshot for the enabled fields
pub trait MetricsSource: Send {
    fn collect(&mut self, stats: &SystemStatsConfig) -> MetricsSnapshot;
}

/// The primary GPU paired with the strategy chosen for its vendor
pub struct GpuMonitor {
    gpu: Arc<GpuDescriptor>,
    strategy: Box<dyn GpuMetricStrategy>,
}

impl GpuMonitor {
    pub fn new(gpu: Arc<GpuDescriptor>, strategy: Box<dyn GpuMetricStrategy>) -> Self {
        Self { gpu, strategy }
    }

    pub fn gpu(&self) -> &GpuDescriptor {
        &self.gpu
    }

    pub fn usage_percent(&self) -> f64 {
        self.strategy.usage_percent(&self.gpu)
    }

    pub fn temperature_celsius(&self) -> f64 {
        self.strategy.temperature_celsius(&self.gpu)
    }

    pub fn vram_used_gib(&self) -> f64 {
        self.strategy.vram_used_gib(&self.gpu)
    }

    pub fn vram_total_gib(&self) -> f64 {
        self.strategy.vram_total_gib(&self.gpu)
    }
}

/// Collects host and GPU metrics, computing only what the config enables
pub struct MetricsCollector {
    system: System,
    components: Components,
    gpu: Option<GpuMonitor>,
}

impl MetricsCollector {
    /// Create a collector. Blocks briefly to take the baseline CPU sample.
    pub fn new(gpu: Option<GpuMonitor>) -> Self {
        let refresh_kind = RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::nothing().with_cpu_usage())
            .with_memory(MemoryRefreshKind::nothing().with_ram());

        let mut system = System::new_with_specifics(refresh_kind);

        // CPU usage is a delta between two refreshes
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        system.refresh_cpu_usage();

        Self {
            system,
            components: Components::new_with_refreshed_list(),
            gpu,
        }
    }

    pub fn gpu(&self) -> Option<&GpuDescriptor> {
        self.gpu.as_ref().map(GpuMonitor::gpu)
    }

    fn cpu_temperature(&mut self) -> f64 {
        self.components.refresh(true);
        pick_cpu_temperature(
            self.components
                .iter()
                .map(|component| (component.label(), component.temperature())),
        )
    }
}

impl MetricsSource for MetricsCollector {
    fn collect(&mut self, stats: &SystemStatsConfig) -> MetricsSnapshot {
        let mut snapshot = MetricsSnapshot::default();

        if stats.cpu_usage {
            self.system.refresh_cpu_usage();
            snapshot.cpu_usage = Some(f64::from(self.system.global_cpu_usage()));
        }

        if stats.cpu_temp {
            let celsius = self.cpu_temperature();
            snapshot.cpu_temp = Some(stats.temp_unit.from_celsius(celsius));
        }

        if let Some(gpu) = &self.gpu {
            if stats.gpu_usage {
                snapshot.gpu_usage = Some(gpu.usage_percent());
            }
            if stats.gpu_temp {
                snapshot.gpu_temp = Some(stats.temp_unit.from_celsius(gpu.temperature_celsius()));
            }
            if stats.vram_usage {
                snapshot.vram_used = Some(gpu.vram_used_gib());
                snapshot.vram_total = Some(gpu.vram_total_gib());
            }
        }

        if stats.ram_usage {
            self.system.refresh_memory();
            snapshot.ram_used = Some(bytes_to_gib(self.system.used_memory()));
            snapshot.ram_total = Some(bytes_to_gib(self.system.total_memory()));
        }

        snapshot
    }
}

/// Pick the CPU package temperature out of `(label, reading)` pairs.
///
/// Labels look like "k10temp Tctl" or "coretemp Package id 0". Returns 0.0 when
/// no known sensor reports.
pub fn pick_cpu_temperature<'a, I>(readings: I) -> f64
where
    I: IntoIterator<Item = (&'a str, Option<f32>)>,
{
    readings
        .into_iter()
        .filter_map(|(label, reading)| {
            let label = label.to_lowercase();
            let known_chip = CPU_SENSOR_CHIPS.iter().any(|chip| label.starts_with(chip));
            let known_label = CPU_SENSOR_LABELS.iter().any(|key| label.contains(key));
            (known_chip && known_label).then_some(reading).flatten()
        })
        .map(f64::from)
        .next()
        .unwrap_or(0.0)
}
