use crate::{
    audio::LogAudio,
    core::Core,
    event::{EventProxyWinit, UserEvent},
    gfx::Gfx,
    stats, storage,
    theme::EguiThemeSink,
    window_icon::window_icon,
};
use anyhow::Result;
use winit::{
    dpi::{LogicalSize, Size},
    event::{ElementState, Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopBuilder},
    window::{Window, WindowBuilder},
};

const APP_NAME: &str = "wgrain";

pub struct App {
    core: Core<EventProxyWinit<UserEvent>>,
    event_loop: EventLoop<UserEvent>,
    gfx: Gfx,
    window: Window,
}

impl App {
    pub fn new() -> Result<Self> {
        let event_loop = EventLoopBuilder::<UserEvent>::with_user_event().build();

        let window = WindowBuilder::new()
            .with_inner_size(Size::Logical(LogicalSize::new(960.0, 540.0)))
            .with_min_inner_size(Size::Logical(LogicalSize::new(480.0, 270.0)))
            .with_title(APP_NAME)
            .with_window_icon(window_icon())
            .build(&event_loop)?;

        let gfx = Gfx::new(&window, &event_loop)?;

        let theme = EguiThemeSink::new(gfx.context().clone());
        let event_proxy = EventProxyWinit::from_proxy(event_loop.create_proxy());

        let core = Core::new(
            event_proxy,
            storage::default_storage(APP_NAME),
            Box::new(theme),
            Box::<LogAudio>::default(),
        );

        stats::spawn_fetch(EventProxyWinit::from_proxy(event_loop.create_proxy()));

        Ok(Self {
            core,
            event_loop,
            gfx,
            window,
        })
    }

    pub fn run(mut self) {
        self.event_loop.run(move |event, _, control_flow| {
            *control_flow = ControlFlow::Poll;

            match event {
                Event::MainEventsCleared => self.window.request_redraw(),
                Event::RedrawRequested(_) => {
                    self.gfx.render(&self.window, |ctx| self.core.ui(ctx));
                }
                Event::WindowEvent {
                    ref event,
                    window_id,
                } if window_id == self.window.id() => {
                    let response = self.gfx.handle_window_event(event);

                    if response.repaint {
                        self.window.request_redraw();
                    }

                    match event {
                        WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
                        WindowEvent::Resized(physical_size) => {
                            self.gfx.on_resized(physical_size.width, physical_size.height);
                            self.window.request_redraw();
                        }
                        WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                            self.gfx.on_scaled(*scale_factor as f32);
                        }
                        WindowEvent::ModifiersChanged(modifiers) => {
                            self.core.set_modifiers(*modifiers);
                        }
                        WindowEvent::KeyboardInput { input, .. } => {
                            if input.state == ElementState::Pressed {
                                if let Some(key) = input.virtual_keycode {
                                    let typing = self.gfx.context().wants_keyboard_input();
                                    if self.core.handle_key(key, typing) {
                                        self.window.request_redraw();
                                    }
                                }
                            }
                        }
                        _ => {}
                    }
                }
                Event::UserEvent(event) => {
                    let response = self.core.handle_user_event(event);

                    if response.quit {
                        *control_flow = ControlFlow::Exit;
                    }

                    if response.request_redraw {
                        self.window.request_redraw();
                    }
                }
                _ => {}
            }
        });
    }
}
