use std::fmt::Display;

use bytemuck::{Pod, Zeroable};
use rand::Rng;
use rand_xoshiro::Xoshiro256StarStar;
use tracing::{debug, info};
use wgpu::util::DeviceExt;

use super::Backend;
use crate::config::{Boundary, DEFAULT_GPU_STEPS};
use crate::error::SimError;
use crate::mcmc::Metropolis;
use crate::spins::SpinGrid;

const WORKGROUP_SIZE: u32 = 64;
/// Upper bound on attempts per dispatch.
const MAX_LAUNCH: usize = 65_536;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct Params {
    rows: u32,
    cols: u32,
    periodic: u32,
    attempts: u32,
    seed: u32,
    _pad: [u32; 3],
    acceptance: [f32; 4],
}

fn unavailable(context: &str, e: impl Display) -> SimError {
    SimError::CapabilityUnavailable(format!("{context}: {e}"))
}

/// Compute-shader backend.
///
/// The lattice lives in a storage buffer as `i32` in unpadded row-major order;
/// out-of-range neighbors read as 0 unless the boundary is periodic. Each
/// dispatch runs up to `min(rows * cols, 65536)` attempts concurrently, every
/// invocation seeding its own PCG stream from the launch seed and its index.
pub struct Gpu {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    params_buffer: wgpu::Buffer,
    adapter_name: String,
}

impl Gpu {
    /// Acquire an adapter and build the pipeline.
    pub fn new() -> Result<Self, SimError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .map_err(|e| unavailable("no GPU adapter", e))?;
        let adapter_name = adapter.get_info().name;

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("ising_device"),
            ..Default::default()
        }))
        .map_err(|e| unavailable("failed to open GPU device", e))?;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("ising"),
            source: wgpu::ShaderSource::Wgsl(include_str!("ising.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ising_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: false },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("ising_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("metropolis_pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("metropolis"),
            compilation_options: Default::default(),
            cache: None,
        });

        let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("params"),
            size: std::mem::size_of::<Params>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        info!(adapter = %adapter_name, "GPU backend ready");
        Ok(Self {
            device,
            queue,
            pipeline,
            bind_group_layout,
            params_buffer,
            adapter_name,
        })
    }

    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }

    fn read_back(&self, spin_buffer: &wgpu::Buffer, size: u64) -> Result<Vec<i32>, SimError> {
        let staging = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("spins_staging"),
            size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("read_encoder"),
            });
        encoder.copy_buffer_to_buffer(spin_buffer, 0, &staging, 0, size);
        self.queue.submit(Some(encoder.finish()));

        let slice = staging.slice(..size);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |r| {
            let _ = tx.send(r);
        });
        self.device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: None,
            })
            .map_err(|e| unavailable("GPU poll failed", e))?;
        rx.recv()
            .map_err(|e| unavailable("GPU readback dropped", e))?
            .map_err(|e| unavailable("GPU buffer map failed", e))?;

        let data = slice.get_mapped_range();
        let spins: Vec<i32> = bytemuck::cast_slice(&data).to_vec();
        drop(data);
        staging.unmap();
        Ok(spins)
    }
}

impl Backend for Gpu {
    fn name(&self) -> &'static str {
        "gpu"
    }

    fn default_steps(&self) -> u64 {
        DEFAULT_GPU_STEPS
    }

    fn run(
        &mut self,
        grid: &mut SpinGrid,
        rule: &Metropolis,
        steps: u64,
        rng: &mut Xoshiro256StarStar,
    ) -> Result<(), SimError> {
        if steps == 0 {
            return Ok(());
        }

        let host: Vec<i32> = grid.values().iter().map(|&s| s as i32).collect();
        let size = std::mem::size_of_val(host.as_slice()) as u64;
        let spin_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("spins"),
                contents: bytemuck::cast_slice(&host),
                usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ising_bind_group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: spin_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: self.params_buffer.as_entire_binding(),
                },
            ],
        });

        let table = rule.acceptance_table();
        let launch = grid.lattice().n_spins.min(MAX_LAUNCH) as u64;
        let mut remaining = steps;
        let mut launches = 0u64;

        while remaining > 0 {
            let attempts = remaining.min(launch) as u32;
            let params = Params {
                rows: grid.rows() as u32,
                cols: grid.cols() as u32,
                periodic: u32::from(grid.boundary() == Boundary::Periodic),
                attempts,
                seed: rng.gen(),
                _pad: [0; 3],
                acceptance: table.map(|p| p as f32),
            };
            self.queue
                .write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(&params));

            let mut encoder = self
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("metropolis_encoder"),
                });
            {
                let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                    label: Some("metropolis_pass"),
                    timestamp_writes: None,
                });
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &bind_group, &[]);
                pass.dispatch_workgroups(attempts.div_ceil(WORKGROUP_SIZE), 1, 1);
            }
            self.queue.submit(Some(encoder.finish()));

            remaining -= attempts as u64;
            launches += 1;
        }

        let spins = self.read_back(&spin_buffer, size)?;
        let values: Vec<i8> = spins.iter().map(|&s| if s < 0 { -1 } else { 1 }).collect();
        grid.set_values(&values);

        debug!(steps, launches, "gpu segment done");
        Ok(())
    }
}
