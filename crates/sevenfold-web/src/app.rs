use crate::gpu::GpuContext;
use crate::input::InputState;
use crate::ui::debug::DebugPanel;
use crate::ui::loading::RevealTimeline;
use crate::ui::{help, loading, player, UiState};
use glam::Vec2;
use sevenfold_audio::bridge::AudioBridge;
use sevenfold_audio::{Listener, TrackPlayer};
use sevenfold_core::constants::MAX_FRAME_GAP_MS;
use sevenfold_render::Renderer;
use sevenfold_scene::input::{command_for_key, Command};
use sevenfold_scene::Scene;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

type RafClosure = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Wheel units per zoom step.
const SCROLL_PER_ZOOM: f32 = 100.0;

/// Main application struct. Owns all subsystems.
pub struct Application {
    gpu: GpuContext,
    renderer: Renderer,
    scene: Scene,
    audio: Option<TrackPlayer<AudioBridge>>,
    ui_state: UiState,
    debug_panel: DebugPanel,
    input: Rc<RefCell<InputState>>,
    reveal: RevealTimeline,
    canvas: web_sys::HtmlCanvasElement,
    dpi_scale: f32,
    last_frame_time: f64,
}

impl Application {
    pub fn new(
        gpu: GpuContext,
        canvas: web_sys::HtmlCanvasElement,
        dpi_scale: f32,
        input: Rc<RefCell<InputState>>,
        scene: Scene,
        audio: Option<TrackPlayer<AudioBridge>>,
    ) -> Self {
        let ui_state = UiState::new(&gpu.device, gpu.surface_config.format, dpi_scale);
        let debug_panel = DebugPanel::new(&gpu.adapter_info);
        let renderer = Renderer::new(
            &gpu.device,
            gpu.surface_config.format,
            gpu.surface_config.width,
            gpu.surface_config.height,
        );
        let stats = renderer.stats();
        log::info!(
            "Renderer ready: {} triangles, {} particles",
            stats.triangles,
            stats.particles
        );

        Self {
            gpu,
            renderer,
            scene,
            audio,
            ui_state,
            debug_panel,
            input,
            reveal: RevealTimeline::default(),
            canvas,
            dpi_scale,
            last_frame_time: 0.0,
        }
    }

    /// Start the requestAnimationFrame loop.
    /// The rAF closure is created once and re-registered every frame.
    pub fn start_loop(app: Rc<RefCell<Self>>) {
        let closure: RafClosure = Rc::new(RefCell::new(None));
        let closure_clone = closure.clone();

        *closure.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
            {
                let mut app_ref = app.borrow_mut();
                let delta = timestamp - app_ref.last_frame_time;

                // Skip the frame after a backgrounded tab
                if app_ref.last_frame_time > 0.0 && delta > MAX_FRAME_GAP_MS {
                    app_ref.last_frame_time = timestamp;
                } else {
                    app_ref.last_frame_time = timestamp;
                    app_ref.debug_panel.update(delta);
                    app_ref.frame(timestamp);
                }
            }
            request_frame(&closure_clone);
        }) as Box<dyn FnMut(f64)>));

        // Kick off first frame
        request_frame(&closure);
    }

    /// Match the canvas backing store to its CSS size.
    fn handle_resize(&mut self) {
        let width = (self.canvas.client_width() as f32 * self.dpi_scale) as u32;
        let height = (self.canvas.client_height() as f32 * self.dpi_scale) as u32;
        if width == 0 || height == 0 {
            return;
        }
        let config = &mut self.gpu.surface_config;
        if config.width == width && config.height == height {
            return;
        }
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        config.width = width;
        config.height = height;
        self.gpu.surface.configure(&self.gpu.device, config);
        self.renderer.resize(&self.gpu.device, width, height);
        log::info!("Resized to {width}x{height}");
    }

    /// One frame: input, overlay, scene update, audio, then GPU work.
    fn frame(&mut self, now_ms: f64) {
        self.handle_resize();

        let (egui_events, keys, clicks, drag, right_drag, scroll, gesture) = {
            let mut input = self.input.borrow_mut();
            let drag = Vec2::new(input.drag_dx, input.drag_dy);
            let out = (
                input.take_egui_events(),
                input.take_keys(),
                input.take_clicks(),
                drag,
                input.right_button_down,
                input.scroll_delta,
                input.take_gesture(),
            );
            input.clear_deltas();
            out
        };

        if gesture {
            if let Some(audio) = self.audio.as_mut() {
                audio.resume();
            }
        }

        let Application {
            gpu,
            renderer,
            scene,
            audio,
            ui_state,
            debug_panel,
            reveal,
            dpi_scale,
            ..
        } = self;

        // -- Overlay --
        let screen =
            ui_state.screen_descriptor(gpu.surface_config.width, gpu.surface_config.height);
        let raw_input = ui_state.raw_input(&screen, now_ms, egui_events);

        let mut ui_commands = Vec::new();
        let mut over_help = false;
        let full_output = ui_state.ctx.run(raw_input, |ctx| {
            loading::show_canvas_veil(ctx, reveal.canvas_alpha(now_ms));
            loading::show_loading_screen(ctx, reveal.loading_alpha(now_ms));
            over_help = help::show(ctx, &mut scene.overlay_mut().help_visible);
            player::show(
                ctx,
                scene.table(),
                scene.store(),
                reveal.player_alpha(now_ms),
                &mut ui_commands,
            );
            if scene.overlay().debug_visible {
                debug_panel.show(ctx);
            }
        });
        let over_ui = ui_state.ctx.is_pointer_over_area();

        // -- Commands --
        for key in keys {
            let Some(command) = command_for_key(&key.key) else {
                continue;
            };
            if key.repeat && !matches!(command, Command::Step(_)) {
                continue;
            }
            scene.command(command);
        }
        for command in ui_commands {
            scene.command(command);
        }

        // A click anywhere outside the tooltip hides it
        if !clicks.is_empty() && !over_help && scene.overlay().help_visible {
            scene.overlay_mut().help_visible = false;
        }

        let physical = Vec2::new(
            gpu.surface_config.width as f32,
            gpu.surface_config.height as f32,
        );
        if !over_ui {
            for click in clicks {
                scene.click(click * *dpi_scale, physical);
            }
            if drag != Vec2::ZERO {
                if right_drag {
                    scene.camera_mut().pan(drag.x, drag.y);
                } else {
                    scene.camera_mut().orbit(drag.x, drag.y);
                }
            }
            if scroll != 0.0 {
                scene.camera_mut().zoom(scroll / SCROLL_PER_ZOOM);
            }
        }

        // -- Scene --
        for event in scene.update(now_ms) {
            log::debug!("scene event: {event:?}");
        }

        let camera = scene.camera();
        let pose = camera.pose();
        let right = camera.right();
        let up = right.cross(camera.forward()).normalize_or_zero();

        if let Some(audio) = audio.as_mut() {
            audio.update(
                scene.store().playing(),
                &Listener {
                    position: pose.position,
                    right,
                },
            );
            debug_panel.set_audio_info(audio.sounding(), audio.settled_count());
        }

        let view_proj = camera.view_proj(physical.x, physical.y);
        renderer.prepare(
            &gpu.queue,
            view_proj,
            right,
            up,
            scene.table(),
            scene.animator().visuals(),
        );

        let stats = renderer.stats();
        debug_panel.set_render_info(stats.triangles, stats.particles);
        debug_panel.set_camera_info(pose.position.to_array(), pose.target.to_array());
        debug_panel.set_scene_info(
            scene.store().focused().map(|i| i.get()),
            scene.store().playing(),
        );

        // -- GPU --
        let output = match gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost) => {
                gpu.surface.configure(&gpu.device, &gpu.surface_config);
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                return;
            }
            Err(e) => {
                log::error!("Surface error: {e:?}");
                return;
            }
        };

        let view = output.texture.create_view(&Default::default());

        let clipped_primitives = ui_state
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        // 1. Scene pass (clears to black)
        renderer.render(&mut encoder, &view);

        // 2. Upload egui textures and update buffers
        for (id, delta) in &full_output.textures_delta.set {
            ui_state
                .renderer
                .update_texture(&gpu.device, &gpu.queue, *id, delta);
        }

        ui_state.renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &clipped_primitives,
            &screen,
        );

        // 3. egui pass on top of the scene
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui-pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();
            ui_state
                .renderer
                .render(&mut pass, &clipped_primitives, &screen);
        }

        // 4. Free textures after rendering
        for id in &full_output.textures_delta.free {
            ui_state.renderer.free_texture(id);
        }

        // 5. Submit and present
        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        // The first presented frame starts the reveal
        if !reveal.is_ready() {
            log::info!("First frame presented");
        }
        reveal.mark_ready(now_ms);
        if reveal.is_finished(now_ms) && !scene.store().is_loaded() {
            scene.store_mut().set_loaded();
            scene.overlay_mut().help_visible = true;
        }
    }
}

fn request_frame(closure: &RafClosure) {
    let window = web_sys::window().expect("no global window");
    window
        .request_animation_frame(
            closure
                .borrow()
                .as_ref()
                .expect("rAF closure missing")
                .as_ref()
                .unchecked_ref(),
        )
        .expect("rAF registration failed");
}
