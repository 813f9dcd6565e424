//! Window and GPU line renderer driving a [`Simulation`].
//!
//! One simulation frame is stepped per redraw. Controls: hold the left mouse
//! button to apply the pointer force, Space pauses, R resets, Escape quits.

use std::sync::Arc;

use log::{error, info, warn};
use wgpu::util::DeviceExt;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::error::{GpuError, RunError};
use crate::input::{Command, Input};
use crate::shader::{segment_vertices, LineVertex, Uniforms, LINE_SHADER};
use crate::simulation::Simulation;
use crate::time::FrameClock;

const WINDOW_TITLE: &str = "Spring Toy";
const LINE_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.05,
    a: 1.0,
};

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    /// Vertices the current vertex buffer can hold.
    vertex_capacity: usize,
    uniform_bind_group: wgpu::BindGroup,
    /// Kept alive for the bind group.
    _uniform_buffer: wgpu::Buffer,
}

impl GpuState {
    pub async fn new(window: Arc<Window>, area: [f32; 2], max_vertices: usize) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let uniforms = Uniforms {
            area,
            _padding: [0.0; 2],
            color: LINE_COLOR,
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Line Shader"),
            source: wgpu::ShaderSource::Wgsl(LINE_SHADER.into()),
        });

        let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: wgpu::VertexFormat::Float32x2,
                    }],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let vertex_capacity = max_vertices.max(2);
        let vertex_buffer = create_vertex_buffer(&device, vertex_capacity);

        info!(
            "Renderer ready: {:?} ({}x{})",
            adapter.get_info().name,
            config.width,
            config.height
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            render_pipeline,
            vertex_buffer,
            vertex_capacity,
            uniform_bind_group,
            _uniform_buffer: uniform_buffer,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Draw `vertices` as a line list.
    pub fn render(&mut self, vertices: &[LineVertex]) -> Result<(), wgpu::SurfaceError> {
        if vertices.len() > self.vertex_capacity {
            self.vertex_capacity = vertices.len().next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.device, self.vertex_capacity);
        }
        if !vertices.is_empty() {
            self.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.draw(0..vertices.len() as u32, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Spring Vertex Buffer"),
        size: (capacity * std::mem::size_of::<LineVertex>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

struct App {
    simulation: Simulation,
    input: Input,
    clock: FrameClock,
    vertices: Vec<LineVertex>,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    error: Option<RunError>,
}

impl App {
    fn new(simulation: Simulation) -> Self {
        let vertices = Vec::with_capacity(simulation.springs().len() * 2);
        Self {
            simulation,
            input: Input::new(),
            clock: FrameClock::new(),
            vertices,
            window: None,
            gpu_state: None,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: RunError) {
        error!("{}", err);
        self.error = Some(err);
        event_loop.exit();
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RunError> {
        let config = self.simulation.config();
        let (width, height) = config.window_size();
        let window_attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_resizable(false)
            .with_inner_size(winit::dpi::PhysicalSize::new(width, height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let gpu_state = pollster::block_on(GpuState::new(
            window.clone(),
            [config.width, config.height],
            self.simulation.springs().len() * 2,
        ))?;

        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        Ok(())
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        for command in self.input.take_commands() {
            match command {
                Command::Quit => {
                    event_loop.exit();
                    return;
                }
                Command::TogglePause => {
                    self.clock.toggle_pause();
                    info!("{}", if self.clock.is_paused() { "Paused" } else { "Resumed" });
                }
                Command::Reset => {
                    info!("Resetting simulation");
                    if let Err(e) = self.simulation.reset() {
                        self.fail(event_loop, e.into());
                        return;
                    }
                }
            }
        }

        let fps_refreshed = self.clock.tick();
        if !self.clock.is_paused() {
            let pointer = self.input.pointer_state(self.simulation.config().render_scale);
            self.simulation.step_frame(pointer);
        }

        segment_vertices(self.simulation.segments(), &mut self.vertices);

        if let Some(gpu_state) = &mut self.gpu_state {
            match gpu_state.render(&self.vertices) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    warn!("Surface lost, reconfiguring");
                    gpu_state.resize(winit::dpi::PhysicalSize {
                        width: gpu_state.config.width,
                        height: gpu_state.config.height,
                    })
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    error!("GPU out of memory");
                    event_loop.exit();
                }
                Err(e) => warn!("Render error: {:?}", e),
            }
        }

        if let Some(window) = &self.window {
            if fps_refreshed {
                let paused = if self.clock.is_paused() { " (paused)" } else { "" };
                window.set_title(&format!("{} - {:.0} FPS{}", WINDOW_TITLE, self.clock.fps(), paused));
            }
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => self.frame(event_loop),
            _ => {}
        }
    }
}

impl Simulation {
    /// Open a window and run the simulation until it is closed.
    ///
    /// The pointer position is divided by `render_scale` to map window
    /// pixels back to simulation units.
    pub fn run(self) -> Result<(), RunError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
