//! wgpu renderer for the image planes.
//!
//! One pipeline, one draw per plane: group 0 holds the camera, group 1 the
//! plane's model matrix, texture and sampler. Planes are composited in
//! scene order with premultiplied alpha over a cleared (by default fully
//! transparent) target, optionally through a 4x multisample buffer.

use glam::{Mat4, Quat};
use rustc_hash::FxHashMap;
use wgpu::util::DeviceExt;

use super::FrameRenderer;
use crate::{
    camera::core::{Camera, CameraUniform},
    error::GalleryError,
    gpu::{
        pipeline_helpers::{
            create_quad_pipeline, filtering_sampler, linear_sampler,
            texture_2d, vertex_uniform_buffer,
        },
        render_context::RenderContext,
        texture::{ImageTexture, MultisampleTarget},
    },
    layout::{PlaneTransform, Viewport},
    options::RendererOptions,
    scene::{MeshId, PlaneMesh, Scene},
};

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct PlaneUniform {
    model: [[f32; 4]; 4],
}

impl PlaneUniform {
    fn from_transform(transform: &PlaneTransform) -> Self {
        let model = Mat4::from_scale_rotation_translation(
            transform.scale.extend(1.0),
            Quat::IDENTITY,
            transform.position,
        );
        Self {
            model: model.to_cols_array_2d(),
        }
    }
}

/// CSS size and pixel ratio of the drawing buffer. Edits only mark it
/// dirty; the surface is reconfigured once, on the next frame.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SurfaceSize {
    viewport: Viewport,
    pixel_ratio: f64,
    dirty: bool,
}

impl SurfaceSize {
    fn new(viewport: Viewport, pixel_ratio: f64) -> Self {
        Self {
            viewport,
            pixel_ratio,
            dirty: false,
        }
    }

    fn physical(&self) -> (u32, u32) {
        self.viewport.physical_size(self.pixel_ratio)
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        if viewport != self.viewport {
            self.viewport = viewport;
            self.dirty = true;
        }
    }

    fn set_pixel_ratio(&mut self, pixel_ratio: f64) {
        if pixel_ratio != self.pixel_ratio {
            self.pixel_ratio = pixel_ratio;
            self.dirty = true;
        }
    }

    /// Clear the dirty flag, returning whether it was set.
    fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

/// GPU resources owned on behalf of one scene mesh.
struct GpuPlane {
    _texture: ImageTexture,
    uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Draws a [`Scene`] of textured planes into a canvas surface.
pub struct PlaneRenderer {
    context: RenderContext,
    options: RendererOptions,
    pipeline: wgpu::RenderPipeline,
    camera_uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    plane_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    planes: FxHashMap<MeshId, GpuPlane>,
    multisample: Option<MultisampleTarget>,
    size: SurfaceSize,
}

impl PlaneRenderer {
    /// Create the GPU context on `target` and build the plane pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::Gpu`] if no adapter, device or surface
    /// configuration is available.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        viewport: Viewport,
        pixel_ratio: f64,
        options: RendererOptions,
    ) -> Result<Self, GalleryError> {
        let context = RenderContext::new(
            target,
            viewport.physical_size(pixel_ratio),
            options.alpha,
        )
        .await?;
        let device = &context.device;

        let camera_uniform = CameraUniform::new();
        let camera_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let camera_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[vertex_uniform_buffer(0)],
            });
        let camera_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Camera Bind Group"),
                layout: &camera_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                }],
            });

        let plane_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Plane Bind Group Layout"),
                entries: &[
                    vertex_uniform_buffer(0),
                    texture_2d(1),
                    filtering_sampler(2),
                ],
            });

        let shader = device.create_shader_module(wgpu::include_wgsl!(
            "../../assets/shaders/plane.wgsl"
        ));
        let sample_count = if options.antialias {
            MultisampleTarget::SAMPLE_COUNT
        } else {
            1
        };
        let pipeline = create_quad_pipeline(
            device,
            "Plane",
            &shader,
            context.format(),
            Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
            sample_count,
            &[&camera_layout, &plane_layout],
        );
        let sampler = linear_sampler(device, "Plane Sampler");

        let mut renderer = Self {
            context,
            options,
            pipeline,
            camera_uniform,
            camera_buffer,
            camera_bind_group,
            plane_layout,
            sampler,
            planes: FxHashMap::default(),
            multisample: None,
            size: SurfaceSize::new(viewport, pixel_ratio),
        };
        renderer.reconfigure();
        Ok(renderer)
    }

    /// Physical size of the drawing buffer.
    #[must_use]
    pub fn physical_size(&self) -> (u32, u32) {
        self.size.physical()
    }

    /// Output size in CSS pixels.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.size.viewport
    }

    /// Number of planes with uploaded GPU resources.
    #[must_use]
    pub fn uploaded_planes(&self) -> usize {
        self.planes.len()
    }

    fn reconfigure(&mut self) {
        let (width, height) = self.physical_size();
        self.context.resize(width, height);
        self.multisample = self.options.antialias.then(|| {
            MultisampleTarget::new(
                &self.context.device,
                self.context.config.width,
                self.context.config.height,
                self.context.format(),
            )
        });
        log::debug!(
            "plane renderer: {}x{} css @ {} -> {}x{} physical",
            self.size.viewport.width,
            self.size.viewport.height,
            self.size.pixel_ratio,
            width,
            height
        );
    }

    fn create_plane(
        context: &RenderContext,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        mesh: &PlaneMesh,
    ) -> GpuPlane {
        let texture = ImageTexture::upload(
            &context.device,
            &context.queue,
            &mesh.texture,
            &mesh.label,
        );
        let uniform = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Plane Uniform"),
                contents: bytemuck::cast_slice(&[PlaneUniform::from_transform(
                    &mesh.transform,
                )]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );
        let bind_group =
            context
                .device
                .create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Plane Bind Group"),
                    layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: uniform.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::TextureView(
                                &texture.view,
                            ),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: wgpu::BindingResource::Sampler(sampler),
                        },
                    ],
                });
        GpuPlane {
            _texture: texture,
            uniform,
            bind_group,
        }
    }

    /// Upload the camera and every plane transform, creating GPU resources
    /// for meshes seen for the first time.
    fn sync_scene(&mut self, scene: &Scene, camera: &Camera) {
        self.camera_uniform.update_view_proj(camera);
        self.context.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera_uniform]),
        );

        for (id, mesh) in scene.iter() {
            let plane = self.planes.entry(id).or_insert_with(|| {
                log::debug!("uploading texture for {}", mesh.label);
                Self::create_plane(
                    &self.context,
                    &self.plane_layout,
                    &self.sampler,
                    mesh,
                )
            });
            self.context.queue.write_buffer(
                &plane.uniform,
                0,
                bytemuck::cast_slice(&[PlaneUniform::from_transform(
                    &mesh.transform,
                )]),
            );
        }
    }
}

impl FrameRenderer for PlaneRenderer {
    fn set_size(&mut self, viewport: Viewport) {
        self.size.set_viewport(viewport);
    }

    fn set_pixel_ratio(&mut self, pixel_ratio: f64) {
        self.size.set_pixel_ratio(pixel_ratio);
    }

    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), GalleryError> {
        if self.size.take_dirty() {
            self.reconfigure();
        }
        self.sync_scene(scene, camera);

        let frame = match self.context.get_next_frame() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                log::warn!("surface lost or outdated; reconfiguring");
                self.context.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("surface timeout; skipping frame");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let (color_view, resolve_target) = match &self.multisample {
            Some(target) => (&target.view, Some(&view)),
            None => (&view, None),
        };

        let mut encoder = self.context.create_encoder();
        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Plane Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: color_view,
                            resolve_target,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(
                                    self.options.wgpu_clear_color(),
                                ),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: None,
                    ..Default::default()
                });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.camera_bind_group, &[]);
            for (id, _) in scene.iter() {
                if let Some(plane) = self.planes.get(&id) {
                    pass.set_bind_group(1, &plane.bind_group, &[]);
                    pass.draw(0..6, 0..1);
                }
            }
        }
        self.context.submit(encoder);
        frame.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_edits_batch_into_one_reconfigure() {
        let mut size = SurfaceSize::new(Viewport::new(800.0, 600.0), 1.0);
        assert!(!size.take_dirty());

        size.set_pixel_ratio(2.0);
        size.set_viewport(Viewport::new(1024.0, 768.0));
        assert_eq!(size.physical(), (2048, 1536));
        assert!(size.take_dirty());
        assert!(!size.take_dirty());
    }

    #[test]
    fn unchanged_size_stays_clean() {
        let mut size = SurfaceSize::new(Viewport::new(800.0, 600.0), 2.0);
        size.set_pixel_ratio(2.0);
        size.set_viewport(Viewport::new(800.0, 600.0));
        assert!(!size.take_dirty());
    }
}
