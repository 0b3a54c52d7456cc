#[cfg(target_arch = "wasm32")]
mod imp {
    use crate::error::SiteError;
    use ::wgpu::util::DeviceExt;
    use gpu::{FrameUniforms, GateVertex, ParticleVertex, Viewport};
    use std::borrow::Cow;
    use wasm_bindgen::JsCast;

    pub struct GpuContext {
        pub _instance: &'static ::wgpu::Instance,
        pub surface: ::wgpu::Surface<'static>,
        pub device: ::wgpu::Device,
        pub queue: ::wgpu::Queue,
        pub config: ::wgpu::SurfaceConfiguration,
        pub canvas: web_sys::HtmlCanvasElement,
        pub gate_pipeline: ::wgpu::RenderPipeline,
        pub particle_pipeline: ::wgpu::RenderPipeline,
        pub uniform_buffer: ::wgpu::Buffer,
        pub uniform_bind_group: ::wgpu::BindGroup,
        pub gate_vertex_buffer: ::wgpu::Buffer,
        pub gate_index_buffer: ::wgpu::Buffer,
        pub gate_index_count: u32,
        pub particle_buffer: ::wgpu::Buffer,
        pub particle_count: u32,
    }

    impl std::fmt::Debug for GpuContext {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("GpuContext")
                .field("width", &self.config.width)
                .field("height", &self.config.height)
                .field("gate_index_count", &self.gate_index_count)
                .field("particle_count", &self.particle_count)
                .finish()
        }
    }

    const FRAME_STRUCT: &str = r#"
struct Frame {
    gate_mvp: mat4x4<f32>,
    particles_mvp: mat4x4<f32>,
    // x: gate opacity, y: particle opacity, z: point size, w: elapsed
    params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: Frame;
"#;

    const GATE_SHADER: &str = r#"
struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) normal: vec3<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) normal: vec3<f32>) -> VsOut {
    return VsOut(frame.gate_mvp * vec4<f32>(position, 1.0), normal);
}

@fragment
fn fs_main(fs_in: VsOut) -> @location(0) vec4<f32> {
    // Normal-as-color wireframe.
    let rgb = normalize(fs_in.normal) * 0.5 + vec3<f32>(0.5);
    return vec4<f32>(rgb, frame.params.x);
}
"#;

    const PARTICLE_SHADER: &str = r#"
@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return frame.particles_mvp * vec4<f32>(position, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 1.0, 1.0, frame.params.y);
}
"#;

    fn shader(device: &::wgpu::Device, label: &str, body: &str) -> ::wgpu::ShaderModule {
        let source = format!("{FRAME_STRUCT}{body}");
        device.create_shader_module(::wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: ::wgpu::ShaderSource::Wgsl(Cow::Owned(source)),
        })
    }

    fn pipeline(
        device: &::wgpu::Device,
        label: &str,
        layout: &::wgpu::PipelineLayout,
        module: &::wgpu::ShaderModule,
        format: ::wgpu::TextureFormat,
        topology: ::wgpu::PrimitiveTopology,
        vertex_layout: ::wgpu::VertexBufferLayout<'_>,
    ) -> ::wgpu::RenderPipeline {
        device.create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: ::wgpu::VertexState {
                module,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout],
            },
            fragment: Some(::wgpu::FragmentState {
                module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(::wgpu::ColorTargetState {
                    format,
                    blend: Some(::wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: ::wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: ::wgpu::PrimitiveState {
                topology,
                strip_index_format: None,
                front_face: ::wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: ::wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            // Both layers are translucent; draw order is the only sort.
            depth_stencil: None,
            multisample: ::wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    }

    pub async fn init_gpu_from_canvas_id(
        canvas_id: &str,
        size: Viewport,
        gate_vertices: &[GateVertex],
        gate_indices: &[u32],
        particles: &[ParticleVertex],
    ) -> Result<GpuContext, SiteError> {
        let window = web_sys::window().ok_or(SiteError::NoWindow)?;
        let document = window.document().ok_or(SiteError::NoDocument)?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| SiteError::MissingElement(canvas_id.to_string()))?
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .map_err(|_| SiteError::MissingElement(canvas_id.to_string()))?;

        // The canvas attribute size is the drawing buffer; CSS only stretches it.
        let (width, height) = (size.width(), size.height());
        canvas.set_width(width);
        canvas.set_height(height);

        // `wgpu::Surface` must not outlive its `wgpu::Instance`; the instance
        // lives for the rest of the page.
        let instance: &'static ::wgpu::Instance = Box::leak(Box::new(::wgpu::Instance::new(
            &::wgpu::InstanceDescriptor {
                backends: ::wgpu::Backends::BROWSER_WEBGPU | ::wgpu::Backends::GL,
                ..Default::default()
            },
        )));

        let surface = instance
            .create_surface(::wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| SiteError::Gpu(format!("surface error: {e}")))?;

        let adapter = instance
            .request_adapter(&::wgpu::RequestAdapterOptions {
                power_preference: ::wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| SiteError::Gpu(format!("adapter error: {e}")))?;

        let (device, queue) = adapter
            .request_device(&::wgpu::DeviceDescriptor {
                label: Some("site-device"),
                required_features: ::wgpu::Features::empty(),
                required_limits: ::wgpu::Limits::downlevel_webgl2_defaults(),
                ..Default::default()
            })
            .await
            .map_err(|e| SiteError::Gpu(format!("device error: {e}")))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| SiteError::Gpu("surface reports no formats".into()))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(::wgpu::CompositeAlphaMode::Auto);

        let config = ::wgpu::SurfaceConfiguration {
            usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            desired_maximum_frame_latency: 2,
            present_mode: ::wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        // Uniform rather than storage binding: WebGL2 has no storage buffers.
        let uniform_buffer = device.create_buffer(&::wgpu::BufferDescriptor {
            label: Some("site-frame-uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: ::wgpu::BufferUsages::UNIFORM | ::wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&::wgpu::BindGroupLayoutDescriptor {
            label: Some("site-frame-bgl"),
            entries: &[::wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: ::wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: ::wgpu::BindingType::Buffer {
                    ty: ::wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&::wgpu::BindGroupDescriptor {
            label: Some("site-frame-bg"),
            layout: &bind_group_layout,
            entries: &[::wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&::wgpu::PipelineLayoutDescriptor {
            label: Some("site-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let gate_shader = shader(&device, "site-gate-shader", GATE_SHADER);
        let particle_shader = shader(&device, "site-particle-shader", PARTICLE_SHADER);

        let gate_pipeline = pipeline(
            &device,
            "site-gate-pipeline",
            &pipeline_layout,
            &gate_shader,
            config.format,
            ::wgpu::PrimitiveTopology::LineList,
            ::wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<GateVertex>() as ::wgpu::BufferAddress,
                step_mode: ::wgpu::VertexStepMode::Vertex,
                attributes: &[
                    ::wgpu::VertexAttribute {
                        format: ::wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 0,
                    },
                    ::wgpu::VertexAttribute {
                        format: ::wgpu::VertexFormat::Float32x3,
                        offset: 12,
                        shader_location: 1,
                    },
                ],
            },
        );

        let particle_pipeline = pipeline(
            &device,
            "site-particle-pipeline",
            &pipeline_layout,
            &particle_shader,
            config.format,
            ::wgpu::PrimitiveTopology::PointList,
            ::wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<ParticleVertex>() as ::wgpu::BufferAddress,
                step_mode: ::wgpu::VertexStepMode::Vertex,
                attributes: &[::wgpu::VertexAttribute {
                    format: ::wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                }],
            },
        );

        let gate_vertex_buffer = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some("site-gate-vertices"),
            contents: bytemuck::cast_slice(gate_vertices),
            usage: ::wgpu::BufferUsages::VERTEX,
        });
        let gate_index_buffer = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some("site-gate-indices"),
            contents: bytemuck::cast_slice(gate_indices),
            usage: ::wgpu::BufferUsages::INDEX,
        });
        let particle_buffer = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some("site-particles"),
            contents: bytemuck::cast_slice(particles),
            usage: ::wgpu::BufferUsages::VERTEX,
        });

        queue.write_buffer(
            &uniform_buffer,
            0,
            bytemuck::bytes_of(&FrameUniforms::default()),
        );

        tracing::debug!(width, height, ?format, "gpu context ready");

        Ok(GpuContext {
            _instance: instance,
            surface,
            device,
            queue,
            config,
            canvas,
            gate_pipeline,
            particle_pipeline,
            uniform_buffer,
            uniform_bind_group,
            gate_vertex_buffer,
            gate_index_buffer,
            gate_index_count: gate_indices.len() as u32,
            particle_buffer,
            particle_count: particles.len() as u32,
        })
    }

    pub fn resize_gpu(ctx: &mut GpuContext, size: Viewport) {
        if (ctx.config.width, ctx.config.height) == (size.width(), size.height()) {
            return;
        }
        ctx.canvas.set_width(size.width());
        ctx.canvas.set_height(size.height());
        ctx.config.width = size.width();
        ctx.config.height = size.height();
        ctx.surface.configure(&ctx.device, &ctx.config);
        tracing::debug!(width = size.width(), height = size.height(), "surface resized");
    }

    pub fn render_frame(ctx: &GpuContext, uniforms: &FrameUniforms) -> Result<(), SiteError> {
        let frame = ctx
            .surface
            .get_current_texture()
            .map_err(|e| SiteError::Gpu(format!("surface acquire failed: {e}")))?;
        let view = frame
            .texture
            .create_view(&::wgpu::TextureViewDescriptor::default());

        ctx.queue
            .write_buffer(&ctx.uniform_buffer, 0, bytemuck::bytes_of(uniforms));

        let mut encoder = ctx
            .device
            .create_command_encoder(&::wgpu::CommandEncoderDescriptor {
                label: Some("site-frame-encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&::wgpu::RenderPassDescriptor {
                label: Some("site-scene-pass"),
                color_attachments: &[Some(::wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: ::wgpu::Operations {
                        load: ::wgpu::LoadOp::Clear(::wgpu::Color {
                            r: 0.008,
                            g: 0.008,
                            b: 0.024,
                            a: 1.0,
                        }),
                        store: ::wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });

            rpass.set_bind_group(0, &ctx.uniform_bind_group, &[]);

            rpass.set_pipeline(&ctx.particle_pipeline);
            rpass.set_vertex_buffer(0, ctx.particle_buffer.slice(..));
            rpass.draw(0..ctx.particle_count, 0..1);

            if uniforms.gate_opacity() > 0.0 {
                rpass.set_pipeline(&ctx.gate_pipeline);
                rpass.set_vertex_buffer(0, ctx.gate_vertex_buffer.slice(..));
                rpass.set_index_buffer(ctx.gate_index_buffer.slice(..), ::wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..ctx.gate_index_count, 0, 0..1);
            }
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use crate::error::SiteError;
    use gpu::{FrameUniforms, GateVertex, ParticleVertex, Viewport};

    #[derive(Debug, Default)]
    pub struct GpuContext;

    pub async fn init_gpu_from_canvas_id(
        _canvas_id: &str,
        _size: Viewport,
        _gate_vertices: &[GateVertex],
        _gate_indices: &[u32],
        _particles: &[ParticleVertex],
    ) -> Result<GpuContext, SiteError> {
        Err(SiteError::Gpu(
            "wgpu initialization is only available on wasm32 targets".into(),
        ))
    }

    pub fn resize_gpu(_ctx: &mut GpuContext, _size: Viewport) {}

    pub fn render_frame(_ctx: &GpuContext, _uniforms: &FrameUniforms) -> Result<(), SiteError> {
        Err(SiteError::Gpu(
            "wgpu rendering is only available on wasm32 targets".into(),
        ))
    }
}

pub use imp::{GpuContext, init_gpu_from_canvas_id, render_frame, resize_gpu};
