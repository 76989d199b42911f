//! wgpu backend for `Scene` display lists.
//!
//! Two pipelines cover every node:
//! - `rect.wgsl` draws rounded rects as SDF quads, filled or stroked
//!   (`stroke == 0` means fill), so `Rect` and `Border` share one batch kind.
//! - `textured.wgsl` draws glyphs from an R8 coverage atlas (`fs_mask`) and
//!   bundled images from per-resource RGBA textures (`fs_image`).
//!
//! Instances are collected for the whole frame first, then uploaded once per
//! kind; draw commands keep paint order and only merge adjacent runs of the
//! same kind. Clips become scissor rects (rounded clip radii are ignored).

use std::borrow::Cow;
use std::collections::HashMap;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont, point};
use fontdb::Database;
use travail_core::{
    ContentScale, FontWeight, Rect, RenderBackend, Scene, SceneNode, UiError, UiResult, theme,
};

const GLYPH_ATLAS_SIZE: u32 = 1024;

struct InstanceBuffer {
    buf: wgpu::Buffer,
    cap: u64,
    label: &'static str,
}

impl InstanceBuffer {
    fn new(device: &wgpu::Device, label: &'static str, cap: u64) -> Self {
        let buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: cap,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { buf, cap, label }
    }

    /// Writes the whole frame's instances, growing the buffer first if needed.
    fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, bytes: &[u8]) {
        let len = bytes.len() as u64;
        if len == 0 {
            return;
        }
        if len > self.cap {
            let cap = len.next_power_of_two();
            log::debug!("growing {} to {} bytes", self.label, cap);
            *self = Self::new(device, self.label, cap);
        }
        queue.write_buffer(&self.buf, 0, bytes);
    }
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    size: [f32; 2],
    _pad: [f32; 2],
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct RectInstance {
    // px
    xywh: [f32; 4],
    radius: f32,
    // 0 = filled
    stroke: f32,
    // linear rgba
    color: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct TexturedInstance {
    xywh: [f32; 4],
    // u0, v0, u1, v1
    uv: [f32; 4],
    color: [f32; 4],
    // images only: 1 = tint replaces color
    mode: f32,
}

const RECT_ATTRS: [wgpu::VertexAttribute; 4] = [
    wgpu::VertexAttribute {
        shader_location: 0,
        offset: 0,
        format: wgpu::VertexFormat::Float32x4,
    },
    wgpu::VertexAttribute {
        shader_location: 1,
        offset: 16,
        format: wgpu::VertexFormat::Float32,
    },
    wgpu::VertexAttribute {
        shader_location: 2,
        offset: 20,
        format: wgpu::VertexFormat::Float32,
    },
    wgpu::VertexAttribute {
        shader_location: 3,
        offset: 24,
        format: wgpu::VertexFormat::Float32x4,
    },
];

const TEXTURED_ATTRS: [wgpu::VertexAttribute; 4] = [
    wgpu::VertexAttribute {
        shader_location: 0,
        offset: 0,
        format: wgpu::VertexFormat::Float32x4,
    },
    wgpu::VertexAttribute {
        shader_location: 1,
        offset: 16,
        format: wgpu::VertexFormat::Float32x4,
    },
    wgpu::VertexAttribute {
        shader_location: 2,
        offset: 32,
        format: wgpu::VertexFormat::Float32x4,
    },
    wgpu::VertexAttribute {
        shader_location: 3,
        offset: 48,
        format: wgpu::VertexFormat::Float32,
    },
];

type GlyphKey = (char, u32, FontWeight);

#[derive(Clone, Copy, Default)]
struct GlyphInfo {
    u0: f32,
    v0: f32,
    u1: f32,
    v1: f32,
    w: f32,
    h: f32,
    /// Offset of the bitmap's top-left from the pen position on the baseline.
    bearing_x: f32,
    bearing_y: f32,
    advance: f32,
}

struct GlyphAtlas {
    tex: wgpu::Texture,
    bind: wgpu::BindGroup,
    size: u32,
    next_x: u32,
    next_y: u32,
    row_h: u32,
    map: HashMap<GlyphKey, GlyphInfo>,
}

impl GlyphAtlas {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        size: u32,
    ) -> Self {
        let tex = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("glyph atlas A8"),
            size: wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = tex.create_view(&wgpu::TextureViewDescriptor::default());
        let bind = texture_bind_group(device, layout, &view, sampler, "glyph atlas bind");
        Self {
            tex,
            bind,
            size,
            next_x: 1,
            next_y: 1,
            row_h: 0,
            map: HashMap::new(),
        }
    }

    /// Row packer; `None` when the atlas is full.
    fn alloc(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if self.next_x + w + 1 >= self.size {
            self.next_x = 1;
            self.next_y += self.row_h + 1;
            self.row_h = 0;
        }
        if self.next_y + h + 1 >= self.size {
            return None;
        }
        let pos = (self.next_x, self.next_y);
        self.next_x += w + 1;
        self.row_h = self.row_h.max(h + 1);
        Some(pos)
    }
}

struct ImageTexture {
    width: u32,
    height: u32,
    bind: wgpu::BindGroup,
    _tex: wgpu::Texture,
}

struct Fonts {
    regular: FontArc,
    bold: FontArc,
    light: FontArc,
}

impl Fonts {
    fn load() -> anyhow::Result<Self> {
        let mut db = Database::new();
        db.load_system_fonts();
        let regular = load_face(&db, fontdb::Weight::NORMAL)?;
        // Families without a bold/light cut fall back to the closest match.
        let bold = load_face(&db, fontdb::Weight::BOLD).unwrap_or_else(|_| regular.clone());
        let light = load_face(&db, fontdb::Weight::LIGHT).unwrap_or_else(|_| regular.clone());
        Ok(Self {
            regular,
            bold,
            light,
        })
    }

    fn get(&self, weight: FontWeight) -> &FontArc {
        match weight {
            FontWeight::Light => &self.light,
            FontWeight::Normal => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }
}

fn load_face(db: &Database, weight: fontdb::Weight) -> anyhow::Result<FontArc> {
    let query = fontdb::Query {
        families: &[fontdb::Family::SansSerif],
        weight,
        ..Default::default()
    };
    let id = db
        .query(&query)
        .ok_or_else(|| anyhow::anyhow!("No system sans-serif font found"))?;
    let (source, _face_index) = db
        .face_source(id)
        .ok_or_else(|| anyhow::anyhow!("Font face not found"))?;

    let font = match source {
        fontdb::Source::Binary(data) => {
            let bytes: &[u8] = data.as_ref().as_ref();
            FontArc::try_from_vec(bytes.to_vec())
                .map_err(|_| anyhow::anyhow!("Failed to load font from binary data"))?
        }
        fontdb::Source::File(path) | fontdb::Source::SharedFile(path, _) => {
            let bytes = std::fs::read(path)?;
            FontArc::try_from_vec(bytes)
                .map_err(|_| anyhow::anyhow!("Failed to load font from file"))?
        }
    };
    Ok(font)
}

struct Raster {
    w: u32,
    h: u32,
    bearing_x: f32,
    bearing_y: f32,
    advance: f32,
    coverage: Vec<u8>,
}

fn rasterize(font: &FontArc, ch: char, px: f32) -> Raster {
    let scaled = font.as_scaled(PxScale::from(px));
    let id = scaled.glyph_id(ch);
    let advance = scaled.h_advance(id);
    let glyph = id.with_scale_and_position(PxScale::from(px), point(0.0, 0.0));

    let Some(outlined) = scaled.outline_glyph(glyph) else {
        // whitespace
        return Raster {
            w: 0,
            h: 0,
            bearing_x: 0.0,
            bearing_y: 0.0,
            advance,
            coverage: Vec::new(),
        };
    };
    let bb = outlined.px_bounds();
    let w = (bb.max.x - bb.min.x).ceil().max(1.0) as u32;
    let h = (bb.max.y - bb.min.y).ceil().max(1.0) as u32;
    let mut coverage = vec![0u8; (w * h) as usize];
    outlined.draw(|gx, gy, cov| {
        let idx = (gy * w + gx) as usize;
        if idx < coverage.len() {
            coverage[idx] = (cov * 255.0) as u8;
        }
    });
    Raster {
        w,
        h,
        bearing_x: bb.min.x,
        bearing_y: bb.min.y,
        advance,
        coverage,
    }
}

/// `<assets>/drawable/<id>.png`, with `.jpg`/`.jpeg` accepted for photos.
pub fn resolve_resource(assets_dir: &Path, id: &str) -> Option<PathBuf> {
    let drawable = assets_dir.join("drawable");
    ["png", "jpg", "jpeg"]
        .iter()
        .map(|ext| drawable.join(format!("{id}.{ext}")))
        .find(|p| p.is_file())
}

/// Reads and decodes drawable `id`, downscaled to fit `max_dim` texels.
fn decode_drawable(assets_dir: &Path, id: &str, max_dim: u32) -> UiResult<image::RgbaImage> {
    let unavailable = |reason: String| UiError::Resource {
        id: id.to_string(),
        reason,
    };
    let path = resolve_resource(assets_dir, id)
        .ok_or_else(|| unavailable(format!("not found in {}", assets_dir.join("drawable").display())))?;
    let mut img = image::open(&path).map_err(|e| unavailable(format!("{}: {e}", path.display())))?;
    if img.width() > max_dim || img.height() > max_dim {
        img = img.thumbnail(max_dim, max_dim);
    }
    Ok(img.to_rgba8())
}

/// Texture sub-rect and destination rect for drawing an `img_w`×`img_h`
/// bitmap into `dst`.
fn place_image(img_w: f32, img_h: f32, dst: Rect, scale: ContentScale) -> ([f32; 4], Rect) {
    if img_w <= 0.0 || img_h <= 0.0 || dst.w <= 0.0 || dst.h <= 0.0 {
        return ([0.0, 0.0, 1.0, 1.0], dst);
    }
    let img_aspect = img_w / img_h;
    let dst_aspect = dst.w / dst.h;
    match scale {
        ContentScale::Crop if img_aspect > dst_aspect => {
            let m = (1.0 - dst_aspect / img_aspect) * 0.5;
            ([m, 0.0, 1.0 - m, 1.0], dst)
        }
        ContentScale::Crop => {
            let m = (1.0 - img_aspect / dst_aspect) * 0.5;
            ([0.0, m, 1.0, 1.0 - m], dst)
        }
        ContentScale::Fit if img_aspect > dst_aspect => {
            let h = dst.w / img_aspect;
            let r = Rect {
                y: dst.y + (dst.h - h) * 0.5,
                h,
                ..dst
            };
            ([0.0, 0.0, 1.0, 1.0], r)
        }
        ContentScale::Fit => {
            let w = dst.h * img_aspect;
            let r = Rect {
                x: dst.x + (dst.w - w) * 0.5,
                w,
                ..dst
            };
            ([0.0, 0.0, 1.0, 1.0], r)
        }
    }
}

/// Clamps `r` to the framebuffer; `None` when nothing is visible.
fn to_scissor(r: Rect, fb_w: u32, fb_h: u32) -> Option<(u32, u32, u32, u32)> {
    let fb = Rect {
        x: 0.0,
        y: 0.0,
        w: fb_w as f32,
        h: fb_h as f32,
    };
    let c = r.intersect(&fb)?;
    let x = c.x.floor().max(0.0) as u32;
    let y = c.y.floor().max(0.0) as u32;
    let w = ((c.x + c.w).ceil() as u32).min(fb_w).saturating_sub(x);
    let h = ((c.y + c.h).ceil() as u32).min(fb_h).saturating_sub(y);
    if w == 0 || h == 0 {
        return None;
    }
    Some((x, y, w, h))
}

fn texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

fn linear_sampler(device: &wgpu::Device, label: &str) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}

#[allow(clippy::too_many_arguments)]
fn instanced_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    fs_entry: &str,
    stride: usize,
    attributes: &[wgpu::VertexAttribute],
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: stride as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes,
            }],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fs_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

enum Cmd {
    PushClip(Rect),
    PopClip,
    Rects(Range<u32>),
    Glyphs(Range<u32>),
    Image { range: Range<u32>, resource: String },
}

/// Appends instance `i` to the trailing command if it is the same kind,
/// otherwise opens a new run.
fn extend_run(cmds: &mut Vec<Cmd>, i: u32, glyphs: bool) {
    match cmds.last_mut() {
        Some(Cmd::Rects(r)) if !glyphs && r.end == i => r.end = i + 1,
        Some(Cmd::Glyphs(r)) if glyphs && r.end == i => r.end = i + 1,
        _ if glyphs => cmds.push(Cmd::Glyphs(i..i + 1)),
        _ => cmds.push(Cmd::Rects(i..i + 1)),
    }
}

pub struct WgpuBackend {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    rect_pipeline: wgpu::RenderPipeline,
    glyph_pipeline: wgpu::RenderPipeline,
    image_pipeline: wgpu::RenderPipeline,
    texture_layout: wgpu::BindGroupLayout,

    globals: wgpu::Buffer,
    globals_bind: wgpu::BindGroup,

    glyph_sampler: wgpu::Sampler,
    image_sampler: wgpu::Sampler,
    glyphs: GlyphAtlas,
    max_atlas: u32,
    fonts: Fonts,

    assets_dir: PathBuf,
    /// `None` marks a resource that failed to load; it is warned about once.
    images: HashMap<String, Option<ImageTexture>>,

    rect_buf: InstanceBuffer,
    glyph_buf: InstanceBuffer,
    image_buf: InstanceBuffer,
}

impl WgpuBackend {
    pub fn new(window: Arc<winit::window::Window>, assets_dir: PathBuf) -> anyhow::Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::from_env_or_default());
        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .map_err(|_e| anyhow::anyhow!("No adapter"))?;

        let (device, queue) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
                label: Some("travail device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            }))?;

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("Surface reports no formats"))?;
        let present_mode = caps
            .present_modes
            .iter()
            .copied()
            .find(|m| *m == wgpu::PresentMode::Mailbox || *m == wgpu::PresentMode::Immediate)
            .unwrap_or(wgpu::PresentMode::Fifo);
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "surface {}x{} {:?} {:?}",
            config.width,
            config.height,
            format,
            present_mode
        );

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let globals = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bind = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals bind"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals.as_entire_binding(),
            }],
        });

        let rect_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("rect.wgsl"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!("shaders/rect.wgsl"))),
        });
        let textured_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("textured.wgsl"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!(
                "shaders/textured.wgsl"
            ))),
        });

        let rect_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("rect pipeline layout"),
            bind_group_layouts: &[&globals_layout],
            immediate_size: 0,
        });
        let textured_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("textured pipeline layout"),
                bind_group_layouts: &[&globals_layout, &texture_layout],
                immediate_size: 0,
            });

        let rect_pipeline = instanced_pipeline(
            &device,
            "rect pipeline",
            &rect_pipeline_layout,
            &rect_shader,
            "fs_main",
            std::mem::size_of::<RectInstance>(),
            &RECT_ATTRS,
            format,
        );
        let glyph_pipeline = instanced_pipeline(
            &device,
            "glyph pipeline",
            &textured_pipeline_layout,
            &textured_shader,
            "fs_mask",
            std::mem::size_of::<TexturedInstance>(),
            &TEXTURED_ATTRS,
            format,
        );
        let image_pipeline = instanced_pipeline(
            &device,
            "image pipeline",
            &textured_pipeline_layout,
            &textured_shader,
            "fs_image",
            std::mem::size_of::<TexturedInstance>(),
            &TEXTURED_ATTRS,
            format,
        );

        let glyph_sampler = linear_sampler(&device, "glyph atlas sampler");
        let image_sampler = linear_sampler(&device, "image sampler");
        let max_atlas = device.limits().max_texture_dimension_2d.min(4096);
        let glyphs = GlyphAtlas::new(
            &device,
            &texture_layout,
            &glyph_sampler,
            GLYPH_ATLAS_SIZE.min(max_atlas),
        );
        let fonts = Fonts::load()?;

        let rect_buf = InstanceBuffer::new(&device, "rect instances", 1 << 16);
        let glyph_buf = InstanceBuffer::new(&device, "glyph instances", 1 << 18);
        let image_buf = InstanceBuffer::new(&device, "image instances", 1 << 12);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            rect_pipeline,
            glyph_pipeline,
            image_pipeline,
            texture_layout,
            globals,
            globals_bind,
            glyph_sampler,
            image_sampler,
            glyphs,
            max_atlas,
            fonts,
            assets_dir,
            images: HashMap::new(),
            rect_buf,
            glyph_buf,
            image_buf,
        })
    }

    fn ensure_glyph(&mut self, key: GlyphKey) {
        if self.glyphs.map.contains_key(&key) {
            return;
        }
        if let Some(info) = self.upload_glyph(key) {
            self.glyphs.map.insert(key, info);
        }
    }

    fn upload_glyph(&mut self, key: GlyphKey) -> Option<GlyphInfo> {
        let (ch, px, weight) = key;
        let r = rasterize(self.fonts.get(weight), ch, px as f32);
        let mut info = GlyphInfo {
            w: r.w as f32,
            h: r.h as f32,
            bearing_x: r.bearing_x,
            bearing_y: r.bearing_y,
            advance: r.advance,
            ..Default::default()
        };
        if r.w == 0 || r.h == 0 {
            return Some(info);
        }

        let (x, y) = match self.glyphs.alloc(r.w, r.h) {
            Some(pos) => pos,
            None => {
                self.grow_glyph_atlas();
                self.glyphs.alloc(r.w, r.h)?
            }
        };
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.glyphs.tex,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            &r.coverage,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(r.w),
                rows_per_image: Some(r.h),
            },
            wgpu::Extent3d {
                width: r.w,
                height: r.h,
                depth_or_array_layers: 1,
            },
        );
        let s = self.glyphs.size as f32;
        info.u0 = x as f32 / s;
        info.v0 = y as f32 / s;
        info.u1 = (x + r.w) as f32 / s;
        info.v1 = (y + r.h) as f32 / s;
        Some(info)
    }

    /// Doubles the atlas (up to the device limit) and re-rasterizes every
    /// cached glyph into it.
    fn grow_glyph_atlas(&mut self) {
        let new_size = (self.glyphs.size * 2).min(self.max_atlas);
        if new_size == self.glyphs.size {
            log::warn!("glyph atlas full at {new_size}px");
            return;
        }
        log::debug!("growing glyph atlas to {new_size}px");
        let keys: Vec<GlyphKey> = self.glyphs.map.keys().copied().collect();
        self.glyphs = GlyphAtlas::new(
            &self.device,
            &self.texture_layout,
            &self.glyph_sampler,
            new_size,
        );
        for k in keys {
            if let Some(info) = self.upload_glyph(k) {
                self.glyphs.map.insert(k, info);
            }
        }
    }

    fn ensure_image(&mut self, resource: &str) {
        if self.images.contains_key(resource) {
            return;
        }
        let tex = match self.load_image(resource) {
            Ok(t) => Some(t),
            Err(e) => {
                log::warn!("{e}");
                None
            }
        };
        self.images.insert(resource.to_string(), tex);
    }

    fn load_image(&self, resource: &str) -> UiResult<ImageTexture> {
        let max = self.device.limits().max_texture_dimension_2d;
        let rgba = decode_drawable(&self.assets_dir, resource, max)?;
        let (width, height) = rgba.dimensions();
        log::debug!("loaded `{resource}` ({width}x{height})");

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let tex = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(resource),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &tex,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            size,
        );
        let view = tex.create_view(&wgpu::TextureViewDescriptor::default());
        let bind = texture_bind_group(
            &self.device,
            &self.texture_layout,
            &view,
            &self.image_sampler,
            "image bind",
        );
        Ok(ImageTexture {
            width,
            height,
            bind,
            _tex: tex,
        })
    }

    /// Rasterizes and uploads everything the scene needs, so atlas growth
    /// cannot invalidate instances built afterwards.
    fn prepare(&mut self, scene: &Scene) {
        for node in &scene.nodes {
            match node {
                SceneNode::Text {
                    text, size, weight, ..
                } => {
                    let px = glyph_px(*size);
                    for ch in text.chars() {
                        self.ensure_glyph((ch, px, *weight));
                    }
                }
                SceneNode::Image { resource, .. } => self.ensure_image(resource),
                _ => {}
            }
        }
    }

    fn build(
        &self,
        scene: &Scene,
    ) -> (Vec<Cmd>, Vec<RectInstance>, Vec<TexturedInstance>, Vec<TexturedInstance>) {
        let mut cmds = Vec::with_capacity(scene.nodes.len());
        let mut rects: Vec<RectInstance> = Vec::new();
        let mut glyphs: Vec<TexturedInstance> = Vec::new();
        let mut images: Vec<TexturedInstance> = Vec::new();

        for node in &scene.nodes {
            match node {
                SceneNode::Rect {
                    rect,
                    color,
                    radius,
                } => {
                    extend_run(&mut cmds, rects.len() as u32, false);
                    rects.push(RectInstance {
                        xywh: [rect.x, rect.y, rect.w, rect.h],
                        radius: *radius,
                        stroke: 0.0,
                        color: color.to_linear(),
                    });
                }
                SceneNode::Border {
                    rect,
                    color,
                    width,
                    radius,
                } => {
                    if *width <= 0.0 {
                        continue;
                    }
                    extend_run(&mut cmds, rects.len() as u32, false);
                    rects.push(RectInstance {
                        xywh: [rect.x, rect.y, rect.w, rect.h],
                        radius: *radius,
                        stroke: *width,
                        color: color.to_linear(),
                    });
                }
                SceneNode::Text {
                    rect,
                    text,
                    color,
                    size,
                    weight,
                } => {
                    let px = glyph_px(*size);
                    let scaled = self.fonts.get(*weight).as_scaled(PxScale::from(px as f32));
                    let line_h = scaled.ascent() - scaled.descent();
                    let baseline = rect.y + (rect.h - line_h) * 0.5 + scaled.ascent();
                    let mut pen_x = rect.x;
                    let mut prev: Option<GlyphId> = None;
                    let color = color.to_linear();

                    for ch in text.chars() {
                        let id = scaled.glyph_id(ch);
                        if let Some(p) = prev {
                            pen_x += scaled.kern(p, id);
                        }
                        prev = Some(id);
                        let Some(info) = self.glyphs.map.get(&(ch, px, *weight)) else {
                            continue;
                        };
                        if info.w > 0.0 && info.h > 0.0 {
                            extend_run(&mut cmds, glyphs.len() as u32, true);
                            glyphs.push(TexturedInstance {
                                xywh: [
                                    (pen_x + info.bearing_x).round(),
                                    (baseline + info.bearing_y).round(),
                                    info.w,
                                    info.h,
                                ],
                                uv: [info.u0, info.v0, info.u1, info.v1],
                                color,
                                mode: 0.0,
                            });
                        }
                        pen_x += info.advance;
                    }
                }
                SceneNode::Image {
                    rect,
                    resource,
                    tint,
                    scale,
                } => match self.images.get(resource.as_str()) {
                    Some(Some(img)) => {
                        let (uv, dst) =
                            place_image(img.width as f32, img.height as f32, *rect, *scale);
                        let i = images.len() as u32;
                        images.push(TexturedInstance {
                            xywh: [dst.x, dst.y, dst.w, dst.h],
                            uv,
                            color: tint.map(|c| c.to_linear()).unwrap_or([1.0; 4]),
                            mode: if tint.is_some() { 1.0 } else { 0.0 },
                        });
                        cmds.push(Cmd::Image {
                            range: i..i + 1,
                            resource: resource.clone(),
                        });
                    }
                    _ => {
                        extend_run(&mut cmds, rects.len() as u32, false);
                        rects.push(RectInstance {
                            xywh: [rect.x, rect.y, rect.w, rect.h],
                            radius: 4.0,
                            stroke: 0.0,
                            color: tint.unwrap_or(theme().outline).with_alpha(0x60).to_linear(),
                        });
                    }
                },
                SceneNode::PushClip { rect, .. } => cmds.push(Cmd::PushClip(*rect)),
                SceneNode::PopClip => cmds.push(Cmd::PopClip),
            }
        }
        (cmds, rects, glyphs, images)
    }
}

fn glyph_px(size: f32) -> u32 {
    size.round().clamp(6.0, 160.0) as u32
}

impl RenderBackend for WgpuBackend {
    fn configure_surface(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    fn frame(&mut self, scene: &Scene) {
        if self.config.width == 0 || self.config.height == 0 {
            return;
        }
        let frame = match self.surface.get_current_texture() {
            Ok(f) => f,
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                log::warn!("surface lost or outdated; reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("surface timeout; skipping frame");
                return;
            }
            Err(e) => {
                log::error!("surface error: {e}");
                return;
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.prepare(scene);
        let (cmds, rects, glyphs, images) = self.build(scene);

        self.queue.write_buffer(
            &self.globals,
            0,
            bytemuck::bytes_of(&Globals {
                size: [self.config.width as f32, self.config.height as f32],
                _pad: [0.0; 2],
            }),
        );
        self.rect_buf
            .write(&self.device, &self.queue, bytemuck::cast_slice(&rects));
        self.glyph_buf
            .write(&self.device, &self.queue, bytemuck::cast_slice(&glyphs));
        self.image_buf
            .write(&self.device, &self.queue, bytemuck::cast_slice(&images));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });

        {
            let [r, g, b, a] = scene.clear_color.to_linear();
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            rpass.set_bind_group(0, &self.globals_bind, &[]);

            let (fb_w, fb_h) = (self.config.width, self.config.height);
            let root = Rect {
                x: 0.0,
                y: 0.0,
                w: fb_w as f32,
                h: fb_h as f32,
            };
            // Each entry is the effective clip; `None` = fully clipped.
            let mut clips: Vec<Option<Rect>> = Vec::with_capacity(8);
            let apply = |rpass: &mut wgpu::RenderPass<'_>, clip: Option<Rect>| {
                if let Some((x, y, w, h)) = clip.and_then(|c| to_scissor(c, fb_w, fb_h)) {
                    rpass.set_scissor_rect(x, y, w, h);
                }
            };
            rpass.set_scissor_rect(0, 0, fb_w, fb_h);

            let rect_size = std::mem::size_of::<RectInstance>() as u64;
            let tex_size = std::mem::size_of::<TexturedInstance>() as u64;

            for cmd in cmds {
                let visible = clips
                    .last()
                    .copied()
                    .unwrap_or(Some(root))
                    .and_then(|c| to_scissor(c, fb_w, fb_h))
                    .is_some();
                match cmd {
                    Cmd::PushClip(r) => {
                        let top = clips.last().copied().unwrap_or(Some(root));
                        let next = top.and_then(|t| t.intersect(&r));
                        clips.push(next);
                        apply(&mut rpass, next);
                    }
                    Cmd::PopClip => {
                        if clips.pop().is_none() {
                            log::warn!("PopClip with empty stack");
                        }
                        apply(&mut rpass, clips.last().copied().unwrap_or(Some(root)));
                    }
                    Cmd::Rects(range) if visible => {
                        rpass.set_pipeline(&self.rect_pipeline);
                        rpass.set_vertex_buffer(
                            0,
                            self.rect_buf
                                .buf
                                .slice(range.start as u64 * rect_size..range.end as u64 * rect_size),
                        );
                        rpass.draw(0..6, 0..range.len() as u32);
                    }
                    Cmd::Glyphs(range) if visible => {
                        rpass.set_pipeline(&self.glyph_pipeline);
                        rpass.set_bind_group(1, &self.glyphs.bind, &[]);
                        rpass.set_vertex_buffer(
                            0,
                            self.glyph_buf
                                .buf
                                .slice(range.start as u64 * tex_size..range.end as u64 * tex_size),
                        );
                        rpass.draw(0..6, 0..range.len() as u32);
                    }
                    Cmd::Image { range, resource } if visible => {
                        let Some(Some(img)) = self.images.get(&resource) else {
                            continue;
                        };
                        rpass.set_pipeline(&self.image_pipeline);
                        rpass.set_bind_group(1, &img.bind, &[]);
                        rpass.set_vertex_buffer(
                            0,
                            self.image_buf
                                .buf
                                .slice(range.start as u64 * tex_size..range.end as u64 * tex_size),
                        );
                        rpass.draw(0..6, 0..range.len() as u32);
                    }
                    _ => {}
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect { x, y, w, h }
    }

    #[test]
    fn scissor_clamps_to_framebuffer() {
        assert_eq!(
            to_scissor(rect(-10.0, 5.5, 50.0, 20.0), 100, 100),
            Some((0, 5, 40, 21))
        );
        assert_eq!(
            to_scissor(rect(90.0, 90.0, 50.0, 50.0), 100, 100),
            Some((90, 90, 10, 10))
        );
        assert_eq!(to_scissor(rect(200.0, 0.0, 10.0, 10.0), 100, 100), None);
        assert_eq!(to_scissor(rect(0.0, 0.0, 0.0, 10.0), 100, 100), None);
    }

    #[test]
    fn crop_trims_the_long_axis() {
        // 2:1 image into a square: keep the middle half horizontally.
        let (uv, dst) = place_image(200.0, 100.0, rect(0.0, 0.0, 50.0, 50.0), ContentScale::Crop);
        assert_eq!(uv, [0.25, 0.0, 0.75, 1.0]);
        assert_eq!(dst, rect(0.0, 0.0, 50.0, 50.0));

        let (uv, _) = place_image(100.0, 200.0, rect(0.0, 0.0, 50.0, 50.0), ContentScale::Crop);
        assert_eq!(uv, [0.0, 0.25, 1.0, 0.75]);
    }

    #[test]
    fn fit_letterboxes() {
        let (uv, dst) = place_image(200.0, 100.0, rect(10.0, 10.0, 50.0, 50.0), ContentScale::Fit);
        assert_eq!(uv, [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(dst, rect(10.0, 22.5, 50.0, 25.0));

        let (_, dst) = place_image(24.0, 24.0, rect(0.0, 0.0, 30.0, 30.0), ContentScale::Fit);
        assert_eq!(dst, rect(0.0, 0.0, 30.0, 30.0));
    }

    #[test]
    fn resources_resolve_under_drawable() {
        let dir = std::env::temp_dir().join(format!("travail-res-{}", std::process::id()));
        let drawable = dir.join("drawable");
        std::fs::create_dir_all(&drawable).unwrap();
        std::fs::write(drawable.join("plane.png"), b"").unwrap();
        std::fs::write(drawable.join("image0.jpg"), b"").unwrap();

        assert_eq!(
            resolve_resource(&dir, "plane"),
            Some(drawable.join("plane.png"))
        );
        assert_eq!(
            resolve_resource(&dir, "image0"),
            Some(drawable.join("image0.jpg"))
        );
        assert_eq!(resolve_resource(&dir, "taxi"), None);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn unusable_drawables_report_resource_errors() {
        let dir = std::env::temp_dir().join(format!("travail-decode-{}", std::process::id()));
        let drawable = dir.join("drawable");
        std::fs::create_dir_all(&drawable).unwrap();
        std::fs::write(drawable.join("busstop.png"), b"not a png").unwrap();

        match decode_drawable(&dir, "taxi", 4096) {
            Err(UiError::Resource { id, reason }) => {
                assert_eq!(id, "taxi");
                assert!(reason.contains("not found"), "{reason}");
            }
            other => panic!("expected a resource error, got {other:?}"),
        }
        assert!(matches!(
            decode_drawable(&dir, "busstop", 4096),
            Err(UiError::Resource { ref id, .. }) if id == "busstop"
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn adjacent_runs_merge_by_kind() {
        let mut cmds = Vec::new();
        extend_run(&mut cmds, 0, false);
        extend_run(&mut cmds, 1, false);
        extend_run(&mut cmds, 0, true);
        extend_run(&mut cmds, 2, false);
        let runs: Vec<_> = cmds
            .iter()
            .map(|c| match c {
                Cmd::Rects(r) => ("rects", r.clone()),
                Cmd::Glyphs(r) => ("glyphs", r.clone()),
                _ => ("other", 0..0),
            })
            .collect();
        assert_eq!(runs, [("rects", 0..2), ("glyphs", 0..1), ("rects", 2..3)]);
    }
}
