use crate::constants::{BOLT_MAX_POINTS, CLEAR_RGB, DEPTH_FORMAT, KEY_LIGHT_POS, SHOCK_CLEAR_RGB};
use crate::core::{Bolt, Camera, LightIntensities, ObjectPose, SceneSink, Viewport};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;
use web_sys as web;

mod helpers;
mod mesh;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    eye: [f32; 4],
    lights: [f32; 4],
    key_pos: [f32; 4],
    bolt_color: [f32; 4],
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    #[allow(dead_code)] // owns the depth attachment behind depth_view
    depth_tex: wgpu::Texture,
    depth_view: wgpu::TextureView,

    prop_pipeline: wgpu::RenderPipeline,
    bolt_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    prop_vertices: wgpu::Buffer,
    prop_indices: wgpu::Buffer,
    prop_index_count: u32,
    bolt_vertices: wgpu::Buffer,
    bolt_len: u32,

    width: u32,
    height: u32,
    clear_color: wgpu::Color,
    model: Mat4,
    cam_eye: Vec3,
    cam_target: Vec3,
    lights: LightIntensities,
    bolt_color: [f32; 3],
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let (depth_tex, depth_view) = helpers::create_texture(
            &device,
            "depth_tex",
            width,
            height,
            DEPTH_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("prop_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::core::PROP_WGSL.into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bgl"),
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
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bg"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("prop_layout"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });

        let prop_pipeline = helpers::make_pipeline(
            &device,
            "prop_pipeline",
            &layout,
            &shader,
            ("vs_prop", "fs_prop"),
            &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<mesh::PropVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &mesh::PROP_VERTEX_ATTRS,
            }],
            wgpu::PrimitiveTopology::TriangleList,
            wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            },
            format,
        );
        // the bolt is drawn over everything
        let bolt_pipeline = helpers::make_pipeline(
            &device,
            "bolt_pipeline",
            &layout,
            &shader,
            ("vs_bolt", "fs_bolt"),
            &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![0 => Float32x3],
            }],
            wgpu::PrimitiveTopology::LineStrip,
            wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            },
            format,
        );

        let (verts, indices) = mesh::build_prop_mesh();
        let prop_vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("prop_vertices"),
            contents: bytemuck::cast_slice(&verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let prop_indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("prop_indices"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let bolt_vertices = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("bolt_vertices"),
            size: (BOLT_MAX_POINTS * std::mem::size_of::<[f32; 3]>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        log::info!("[gpu] ready {}x{} format={:?}", width, height, format);
        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_tex,
            depth_view,
            prop_pipeline,
            bolt_pipeline,
            uniform_buffer,
            bind_group,
            prop_vertices,
            prop_indices,
            prop_index_count: indices.len() as u32,
            bolt_vertices,
            bolt_len: 0,
            width,
            height,
            clear_color: rgb_to_color(CLEAR_RGB),
            model: Mat4::IDENTITY,
            cam_eye: Vec3::Z,
            cam_target: Vec3::ZERO,
            lights: LightIntensities::default(),
            bolt_color: [0.0; 3],
        })
    }

    fn globals(&self) -> Globals {
        let mut camera = Camera::looking_at_scene(
            self.cam_eye,
            Viewport::new(self.width as f32, self.height as f32),
        );
        camera.target = self.cam_target;
        Globals {
            view_proj: camera.view_projection().to_cols_array_2d(),
            model: self.model.to_cols_array_2d(),
            eye: self.cam_eye.extend(1.0).to_array(),
            lights: self.lights.to_array(),
            key_pos: [KEY_LIGHT_POS[0], KEY_LIGHT_POS[1], KEY_LIGHT_POS[2], 1.0],
            bolt_color: [self.bolt_color[0], self.bolt_color[1], self.bolt_color[2], 1.0],
        }
    }
}

fn rgb_to_color(rgb: [f32; 3]) -> wgpu::Color {
    wgpu::Color {
        r: rgb[0] as f64,
        g: rgb[1] as f64,
        b: rgb[2] as f64,
        a: 1.0,
    }
}

impl<'a> SceneSink for GpuState<'a> {
    fn set_object_pose(&mut self, pose: &ObjectPose) {
        self.model = pose.model_matrix();
    }

    fn set_light_intensities(&mut self, lights: &LightIntensities) {
        self.lights = *lights;
        // the zap lights up the whole room
        let s = lights.shock.max(0.0);
        self.clear_color = rgb_to_color(std::array::from_fn(|i| {
            (CLEAR_RGB[i] + SHOCK_CLEAR_RGB[i] * s).min(1.0)
        }));
    }

    fn set_camera_pose(&mut self, eye: Vec3, target: Vec3) {
        self.cam_eye = eye;
        self.cam_target = target;
    }

    fn set_lightning(&mut self, bolt: Option<&Bolt>) {
        match bolt {
            Some(b) if b.visible && b.points.len() >= 2 => {
                let n = b.points.len().min(BOLT_MAX_POINTS);
                let data: Vec<[f32; 3]> = b.points[..n].iter().map(|p| p.to_array()).collect();
                self.queue
                    .write_buffer(&self.bolt_vertices, 0, bytemuck::cast_slice(&data));
                self.bolt_len = n as u32;
                self.bolt_color = b.color;
            }
            _ => self.bolt_len = 0,
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            let (tex, view) = helpers::create_texture(
                &self.device,
                "depth_tex",
                width,
                height,
                DEPTH_FORMAT,
                wgpu::TextureUsages::RENDER_ATTACHMENT,
            );
            self.depth_tex = tex;
            self.depth_view = view;
        }
    }

    fn draw_frame(&mut self, _dt_sec: f32) -> anyhow::Result<()> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&self.globals()));
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.bind_group, &[]);
            rpass.set_pipeline(&self.prop_pipeline);
            rpass.set_vertex_buffer(0, self.prop_vertices.slice(..));
            rpass.set_index_buffer(self.prop_indices.slice(..), wgpu::IndexFormat::Uint16);
            rpass.draw_indexed(0..self.prop_index_count, 0, 0..1);

            if self.bolt_len >= 2 {
                rpass.set_pipeline(&self.bolt_pipeline);
                rpass.set_vertex_buffer(0, self.bolt_vertices.slice(..));
                rpass.draw(0..self.bolt_len, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
