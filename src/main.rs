#![windows_subsystem = "windows"]

use anyhow::Result;
use cubegrid::{CommitOutcome, GridConfig, Panel, PointerEvent, Surface, export};
use druid::menu::MenuEventCtx;
use druid::piet::{ImageFormat, PietImage};
use druid::{
    AppLauncher, BoxConstraints, Data, Env, Event, EventCtx, LayoutCtx, LifeCycle, LifeCycleCtx,
    Menu, MenuItem, PaintCtx, Point, RenderContext, Selector, Size, UpdateCtx, Widget, WindowDesc,
};
use rfd::MessageDialog;

mod piet_surface;
use piet_surface::PietSurface;

const COPY_COVERINGS: Selector = Selector::new("cubegrid.copy-coverings");
const EXPORT_PNG: Selector = Selector::new("cubegrid.export-png");

#[derive(Clone, Data, Default)]
struct AppState {
    coverings: usize,
    dragging: bool,
}

// Widget implementation
struct GridWidget {
    panel: Panel,
    cached_image: Option<PietImage>,
}

fn to_grid(pos: Point) -> cubegrid::Point {
    cubegrid::Point::new(pos.x, pos.y)
}

impl GridWidget {
    fn dispatch(&mut self, ctx: &mut EventCtx, data: &mut AppState, event: PointerEvent) {
        let response = self.panel.handle(event);
        if response.redraw {
            ctx.request_paint();
        }
        if let Some(CommitOutcome::Conflict { with }) = response.outcome {
            log::debug!("selection overlaps covering #{with}, discarded");
        }
        data.coverings = self.panel.coverings().len();
        data.dragging = self.panel.is_dragging();
    }

    fn export_png(&self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name("cubegrid.png")
            .save_file()
        else {
            return;
        };
        if let Err(e) = export::save_png(&self.panel, &path) {
            log::error!("{e:#}");
            MessageDialog::new()
                .set_title("Export failed")
                .set_description(format!("{e:#}"))
                .show();
        }
    }
}

impl Widget<AppState> for GridWidget {
    fn event(&mut self, ctx: &mut EventCtx, event: &Event, data: &mut AppState, _env: &Env) {
        match event {
            Event::MouseDown(e) if e.button.is_left() => {
                ctx.set_active(true);
                self.dispatch(ctx, data, PointerEvent::Press(to_grid(e.pos)));
            }

            Event::MouseDown(e) if e.button.is_right() && !ctx.is_active() => {
                ctx.show_context_menu(make_context_menu(), e.pos);
            }

            Event::MouseMove(e) if ctx.is_active() => {
                self.dispatch(ctx, data, PointerEvent::Move(to_grid(e.pos)));
            }

            Event::MouseUp(e) if e.button.is_left() && ctx.is_active() => {
                ctx.set_active(false);
                self.dispatch(ctx, data, PointerEvent::Release(to_grid(e.pos)));
            }

            Event::Command(cmd) if cmd.is(COPY_COVERINGS) => {
                if let Err(e) = export::copy_coverings(&self.panel) {
                    log::error!("{e:#}");
                }
            }

            Event::Command(cmd) if cmd.is(EXPORT_PNG) => self.export_png(),

            _ => {}
        }
    }

    fn lifecycle(
        &mut self,
        _ctx: &mut LifeCycleCtx,
        _event: &LifeCycle,
        _data: &AppState,
        _env: &Env,
    ) {
    }

    fn update(&mut self, ctx: &mut UpdateCtx, old: &AppState, data: &AppState, _env: &Env) {
        if old.coverings != data.coverings {
            ctx.request_paint();
        }
    }

    fn layout(&mut self, _ctx: &mut LayoutCtx, _bc: &BoxConstraints, _data: &AppState, _env: &Env) -> Size {
        let config = self.panel.config();
        Size::new(config.surface_width as f64, config.surface_height as f64)
    }

    fn paint(&mut self, ctx: &mut PaintCtx, _data: &AppState, _env: &Env) {
        if self.cached_image.is_none() {
            let bg = self.panel.background();
            self.cached_image = ctx
                .make_image(bg.width() as usize, bg.height() as usize, &bg.to_rgba(), ImageFormat::RgbaSeparate)
                .map_err(|e| log::error!("could not cache grid background: {e}"))
                .ok();
        }
        let Some(img) = &self.cached_image else {
            return;
        };

        let size = ctx.size();
        let background = self.panel.config().background_color;
        let mut surface = PietSurface::new(&mut *ctx.render_ctx, size.width, size.height, background);
        self.panel.render(&mut surface, img);
    }
}

fn make_context_menu() -> Menu<AppState> {
    Menu::empty()
        .entry(MenuItem::new("Copy coverings").on_activate(|ctx: &mut MenuEventCtx, _data: &mut AppState, _| {
            ctx.submit_command(COPY_COVERINGS);
        }))
        .entry(MenuItem::new("Export PNG...").on_activate(|ctx: &mut MenuEventCtx, _data: &mut AppState, _| {
            ctx.submit_command(EXPORT_PNG);
        }))
        .entry(MenuItem::new("Quit").on_activate(|ctx, _, _| ctx.submit_command(druid::commands::QUIT_APP)))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = GridConfig::load();
    let (w, h) = (config.surface_width as f64, config.surface_height as f64);
    let panel = Panel::new(config)?;

    let window = WindowDesc::new(GridWidget { panel, cached_image: None })
        .title(|data: &AppState, _env: &Env| {
            if data.dragging {
                format!("cubegrid ({} coverings, selecting)", data.coverings)
            } else {
                format!("cubegrid ({} coverings)", data.coverings)
            }
        })
        .window_size((w, h))
        .resizable(false);
    AppLauncher::with_window(window).launch(AppState::default())?;
    Ok(())
}
