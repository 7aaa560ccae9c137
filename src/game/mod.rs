//! Session controller and browser glue.
//!
//! Builds the four screens (home, playing, result, leaderboard) once at
//! startup, then runs the game as a small view-state machine over a
//! thread-local state cell. Motion samples, interval ticks, and clicks all
//! arrive on the same logical thread; the only suspension points are the
//! motion-permission prompt and the flavor-text request, both of which
//! re-validate the state they land in before touching it.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, window};

pub mod flavor;
pub mod leaderboard;
pub mod modes;
pub mod session;
pub mod shake;
pub mod telegram;
pub mod timer;

use leaderboard::{Leaderboard, LocalStorage, ScoreEntry};
use modes::{GameMode, format_time};
use session::{FILL_MAX, SessionState};
use shake::{Sample, ShakeDetector};
use timer::Tick;

// --- View-state machine -------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum View {
    Home,
    Playing,
    Result,
    Leaderboard,
}

const SCREENS: [(&str, View); 4] = [
    ("sm-home", View::Home),
    ("sm-playing", View::Playing),
    ("sm-result", View::Result),
    ("sm-leaderboard", View::Leaderboard),
];

/// Whole-app state. Owns the per-session resources (interval handle, motion
/// listener) so every exit from `Playing` can release them synchronously.
struct App {
    view: View,
    session: Option<SessionState>,
    detector: ShakeDetector,
    board: Leaderboard,
    board_filter: Option<GameMode>,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    timer_handle: Option<i32>,
    // The interval closure outlives its handle: it may be the frame we are
    // currently executing in, so it is only dropped when the next session
    // installs a replacement.
    timer_closure: Option<Closure<dyn FnMut()>>,
    motion_closure: Option<Closure<dyn FnMut(web_sys::DeviceMotionEvent)>>,
    // Stamps flavor-text requests; responses carrying a stale stamp are
    // discarded instead of overwriting a newer view.
    flavor_generation: u64,
}

thread_local! {
    static APP_STATE: RefCell<Option<App>> = RefCell::new(None);
}

fn with_app(f: impl FnOnce(&mut App)) {
    APP_STATE.with(|cell| {
        if let Some(app) = cell.borrow_mut().as_mut() {
            f(app);
        }
    });
}

// --- Startup ------------------------------------------------------------------

pub fn start_app() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    telegram::init();
    build_dom(&doc)?;

    let canvas: HtmlCanvasElement = doc
        .get_element_by_id("sm-jar")
        .ok_or_else(|| JsValue::from_str("no jar canvas"))?
        .dyn_into()?;
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    let board = Leaderboard::load(Box::new(LocalStorage));
    web_sys::console::log_1(
        &format!("shake-master: {} stored leaderboard entries", board.len()).into(),
    );

    APP_STATE.with(|cell| {
        cell.replace(Some(App {
            view: View::Home,
            session: None,
            detector: ShakeDetector::new(),
            board,
            board_filter: None,
            canvas,
            ctx,
            timer_handle: None,
            timer_closure: None,
            motion_closure: None,
            flavor_generation: 0,
        }))
    });

    wire_listeners(&doc)?;
    start_frame_loop();
    Ok(())
}

// --- Session lifecycle --------------------------------------------------------

fn start_mode(app: &mut App, mode: GameMode) {
    app.detector = ShakeDetector::new();
    app.session = Some(SessionState::new(mode));
    // Invalidate any flavor response still in flight from a previous session.
    app.flavor_generation += 1;
    set_text("sm-score", "0");
    set_text("sm-time", &format_time(mode.seconds()));
    set_text("sm-flavor", "");
    show_view(app, View::Playing);
    start_timer(app);
    begin_motion_capture(app);
}

fn on_timer_tick(app: &mut App) {
    let expired = match app.session.as_mut() {
        Some(session) => matches!(session.timer.tick(), Tick::Expired),
        None => false,
    };
    if expired {
        finish_session(app);
    }
}

/// The single exit path from `Playing`: releases the interval and the motion
/// subscription, records the score, and moves to the result view. No-op in
/// any other view or without a session, so expiry and manual stop stay
/// idempotent against each other.
fn finish_session(app: &mut App) {
    if app.view != View::Playing {
        return;
    }
    let (score, mode) = match app.session.as_mut() {
        Some(session) => {
            session.timer.stop();
            (session.score, session.mode)
        }
        None => return,
    };
    stop_timer(app);
    detach_motion(app);

    let entry = ScoreEntry {
        username: telegram::display_name(),
        score,
        mode,
        date: js_sys::Date::now() as u64,
    };
    if !app.board.record(entry) {
        web_sys::console::warn_1(&"leaderboard: persist failed, keeping scores in memory".into());
    }

    set_text("sm-result-score", &score.to_string());
    set_text("sm-result-mode", mode.label());
    set_text("sm-flavor", "…");
    show_view(app, View::Result);

    app.flavor_generation += 1;
    let generation = app.flavor_generation;
    spawn_local(async move {
        let text = flavor::generate(score, mode).await;
        with_app(|app| {
            if app.flavor_generation == generation && app.view == View::Result {
                set_text("sm-flavor", &format!("«{text}»"));
            }
        });
    });
}

fn start_timer(app: &mut App) {
    stop_timer(app);
    let closure = Closure::wrap(Box::new(move || {
        with_app(on_timer_tick);
    }) as Box<dyn FnMut()>);
    let handle = window().map(|w| {
        w.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            1_000,
        )
    });
    match handle {
        Some(Ok(handle)) => {
            app.timer_handle = Some(handle);
            // Replacing the previous session's closure drops it here, outside
            // any invocation of itself.
            app.timer_closure = Some(closure);
        }
        _ => web_sys::console::error_1(&"failed to start session timer".into()),
    }
}

/// Clears the interval so no further ticks fire. The closure object stays put
/// (see the field comment on `timer_closure`).
fn stop_timer(app: &mut App) {
    if let Some(handle) = app.timer_handle.take() {
        if let Some(w) = window() {
            w.clear_interval_with_handle(handle);
        }
    }
}

// --- Motion capture -----------------------------------------------------------

fn begin_motion_capture(app: &mut App) {
    detach_motion(app);
    let Some(win) = window() else {
        return;
    };
    // iOS exposes an explicit permission prompt as a static on the event
    // constructor; everywhere else the listener can be attached directly.
    let request = js_sys::Reflect::get(win.as_ref(), &"DeviceMotionEvent".into())
        .ok()
        .filter(|ctor| !ctor.is_undefined())
        .and_then(|ctor| js_sys::Reflect::get(&ctor, &"requestPermission".into()).ok())
        .and_then(|f| f.dyn_into::<js_sys::Function>().ok());
    let Some(request) = request else {
        attach_motion(app);
        return;
    };
    match request.call0(&JsValue::UNDEFINED) {
        Ok(pending) => match pending.dyn_into::<js_sys::Promise>() {
            Ok(promise) => {
                spawn_local(async move {
                    let verdict = JsFuture::from(promise).await;
                    with_app(|app| on_permission_result(app, verdict));
                });
            }
            Err(_) => attach_motion(app),
        },
        Err(err) => {
            // Denied or unavailable: the session continues timer-only.
            web_sys::console::warn_1(&err);
        }
    }
}

fn on_permission_result(app: &mut App, verdict: Result<JsValue, JsValue>) {
    let granted = matches!(&verdict, Ok(state) if state.as_string().as_deref() == Some("granted"));
    if !granted {
        web_sys::console::warn_1(&"motion permission denied; continuing timer-only".into());
        return;
    }
    // The prompt may resolve after the session already ended.
    let still_playing =
        app.view == View::Playing && app.session.as_ref().is_some_and(|s| s.is_active());
    if still_playing {
        attach_motion(app);
    }
}

fn attach_motion(app: &mut App) {
    let Some(win) = window() else {
        return;
    };
    let closure = Closure::wrap(Box::new(move |event: web_sys::DeviceMotionEvent| {
        with_app(|app| on_motion(app, &event));
    }) as Box<dyn FnMut(_)>);
    match win.add_event_listener_with_callback("devicemotion", closure.as_ref().unchecked_ref()) {
        Ok(()) => app.motion_closure = Some(closure),
        Err(err) => web_sys::console::warn_1(&err),
    }
}

fn detach_motion(app: &mut App) {
    if let Some(closure) = app.motion_closure.take() {
        if let Some(win) = window() {
            win.remove_event_listener_with_callback("devicemotion", closure.as_ref().unchecked_ref())
                .ok();
        }
    }
}

fn on_motion(app: &mut App, event: &web_sys::DeviceMotionEvent) {
    let Some(session) = app.session.as_mut() else {
        return;
    };
    if !session.is_active() {
        return;
    }
    let Some(acc) = event.acceleration_including_gravity() else {
        return;
    };
    let sample = Sample {
        x: acc.x(),
        y: acc.y(),
        z: acc.z(),
        timestamp_ms: js_sys::Date::now(),
    };
    if let Some(shake) = app.detector.process(&sample) {
        session.apply_shake(&shake);
        telegram::haptic_impact();
    }
}

// --- Frame loop & jar rendering -----------------------------------------------

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_frame_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        with_app(|app| frame_tick(app, ts));
        if let Some(w) = window() {
            let _ =
                w.request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(w) = window() {
        let _ = w.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

fn frame_tick(app: &mut App, now: f64) {
    if app.view != View::Playing {
        return;
    }
    let Some(session) = app.session.as_ref() else {
        return;
    };
    set_text("sm-score", &session.score.to_string());
    let left = session.time_left_secs();
    set_text("sm-time", &format_time(left));
    if let Some(el) = element_by_id("sm-time") {
        let style = if left < 10 { TIME_WARN_STYLE } else { TIME_STYLE };
        el.set_attribute("style", style).ok();
    }
    draw_jar(&app.ctx, &app.canvas, session.fill_level, now);
}

fn draw_jar(ctx: &CanvasRenderingContext2d, canvas: &HtmlCanvasElement, fill_level: f64, now: f64) {
    let w = canvas.width() as f64;
    let h = canvas.height() as f64;
    ctx.clear_rect(0.0, 0.0, w, h);

    let left = w * 0.18;
    let top = h * 0.10;
    let bottom = h * 0.94;
    let jar_w = w - left * 2.0;
    let jar_h = bottom - top;

    // Glass body
    ctx.set_fill_style_str("rgba(255,255,255,0.06)");
    ctx.fill_rect(left, top, jar_w, jar_h);

    // Liquid column from the bottom up
    let fill_h = jar_h * (fill_level / FILL_MAX);
    let surface = bottom - fill_h;
    if fill_h > 0.0 {
        ctx.set_fill_style_str("#f8fafc");
        ctx.fill_rect(left, surface, jar_w, fill_h);
    }

    // Wave crest along the liquid surface while the jar is partially full
    if fill_level > 0.0 && fill_level < FILL_MAX {
        ctx.begin_path();
        ctx.move_to(left, surface);
        let mut x = left;
        while x <= left + jar_w {
            let phase = (x - left) / jar_w * std::f64::consts::TAU + now / 180.0;
            ctx.line_to(x, surface - phase.sin() * 3.0);
            x += 8.0;
        }
        ctx.line_to(left + jar_w, surface);
        ctx.close_path();
        ctx.set_fill_style_str("rgba(248,250,252,0.8)");
        ctx.fill();
    }

    // Outline and lid line
    ctx.set_stroke_style_str("rgba(255,255,255,0.35)");
    ctx.set_line_width(4.0);
    ctx.stroke_rect(left, top, jar_w, jar_h);
    ctx.begin_path();
    ctx.move_to(left - 8.0, top);
    ctx.line_to(left + jar_w + 8.0, top);
    ctx.stroke();

    // Percent caption, dark once the liquid rises behind it
    ctx.set_font("28px 'Fira Code', monospace");
    ctx.set_text_align("center");
    ctx.set_fill_style_str(if fill_level > 50.0 { "#0f172a" } else { "#ffffff" });
    ctx.fill_text(
        &format!("{}%", fill_level.floor() as u32),
        w / 2.0,
        (top + bottom) / 2.0,
    )
    .ok();
}

// --- Views --------------------------------------------------------------------

fn show_view(app: &mut App, view: View) {
    app.view = view;
    let Some(doc) = document() else {
        return;
    };
    for (id, v) in SCREENS {
        if let Some(el) = doc.get_element_by_id(id) {
            el.set_attribute("style", &screen_style(v == view)).ok();
        }
    }
}

fn render_board(app: &App) {
    let Some(doc) = document() else {
        return;
    };
    for i in 0..=GameMode::ALL.len() {
        let chip_filter = (i > 0).then(|| GameMode::ALL[i - 1]);
        if let Some(el) = doc.get_element_by_id(&format!("sm-filter-{i}")) {
            let style = if chip_filter == app.board_filter {
                CHIP_SELECTED_STYLE
            } else {
                CHIP_STYLE
            };
            el.set_attribute("style", style).ok();
        }
    }

    let entries = app.board.list(app.board_filter);
    if entries.is_empty() {
        set_inner_html(
            "sm-board-list",
            "<div style='text-align:center; padding:60px 0; color:#64748b;'>Пока результатов нет</div>",
        );
        return;
    }
    let mut html = String::new();
    for (i, entry) in entries.iter().enumerate() {
        let rank_color = if i < 3 { "#facc15" } else { "#94a3b8" };
        let date = String::from(
            js_sys::Date::new(&JsValue::from_f64(entry.date as f64))
                .to_locale_date_string("ru-RU", &JsValue::UNDEFINED),
        );
        html.push_str(&format!(
            "<div style='display:flex; justify-content:space-between; align-items:center; \
             padding:12px 16px; margin-bottom:8px; background:rgba(255,255,255,0.05); \
             border:1px solid rgba(255,255,255,0.1); border-radius:12px;'>\
             <span style='color:{rank_color}; font-weight:bold; width:2.2em;'>#{rank}</span>\
             <span style='flex:1;'>{name}<br>\
             <span style='font-size:12px; color:#94a3b8;'>{mode} • {date}</span></span>\
             <span style='font-weight:900; font-size:18px;'>{score}</span>\
             </div>",
            rank = i + 1,
            name = escape_html(&entry.username),
            mode = entry.mode.label(),
            score = entry.score,
        ));
    }
    set_inner_html("sm-board-list", &html);
}

// --- DOM construction ---------------------------------------------------------

const ROOT_STYLE: &str = "position:fixed; inset:0; overflow:hidden; background:#0f172a; \
     color:#ffffff; font-family:system-ui, sans-serif;";

const TIME_STYLE: &str = "font-size:34px; font-weight:900; font-variant-numeric:tabular-nums;";
const TIME_WARN_STYLE: &str =
    "font-size:34px; font-weight:900; font-variant-numeric:tabular-nums; color:#ef4444;";

const BUTTON_STYLE: &str = "background:rgba(255,255,255,0.1); color:#ffffff; \
     border:1px solid rgba(255,255,255,0.2); padding:20px; border-radius:16px; \
     font-size:22px; font-weight:bold; cursor:pointer;";

const NAV_BUTTON_STYLE: &str = "width:100%; padding:14px; margin-top:10px; border-radius:12px; \
     background:#1e293b; color:#ffffff; border:1px solid rgba(255,255,255,0.1); \
     font-size:16px; font-weight:bold; cursor:pointer;";

const CHIP_STYLE: &str = "padding:4px 14px; margin-right:6px; border-radius:999px; \
     font-size:12px; background:transparent; color:#ffffff; \
     border:1px solid rgba(255,255,255,0.3); cursor:pointer;";
const CHIP_SELECTED_STYLE: &str = "padding:4px 14px; margin-right:6px; border-radius:999px; \
     font-size:12px; background:#ffffff; color:#0f172a; border:1px solid #ffffff; \
     cursor:pointer;";

fn screen_style(visible: bool) -> String {
    format!(
        "position:absolute; inset:0; max-width:28rem; margin:0 auto; padding:24px; \
         flex-direction:column; display:{};",
        if visible { "flex" } else { "none" }
    )
}

fn build_dom(doc: &Document) -> Result<(), JsValue> {
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;
    let root = doc.create_element("div")?;
    root.set_id("sm-root");
    root.set_attribute("style", ROOT_STYLE)?;
    body.append_child(&root)?;

    for (id, view) in SCREENS {
        let screen = doc.create_element("div")?;
        screen.set_id(id);
        screen.set_attribute("style", &screen_style(view == View::Home))?;
        screen.set_inner_html(&match view {
            View::Home => home_html(),
            View::Playing => playing_html(),
            View::Result => result_html(),
            View::Leaderboard => board_html(),
        });
        root.append_child(&screen)?;
    }
    Ok(())
}

fn home_html() -> String {
    let mut buttons = String::new();
    for (i, mode) in GameMode::ALL.into_iter().enumerate() {
        if mode == GameMode::Infinite {
            buttons.push_str(&format!(
                "<button id='sm-mode-{i}' style='{BUTTON_STYLE} grid-column:span 2; \
                 background:linear-gradient(90deg,#2563eb,#9333ea); border:none;'>\
                 ПОЛНАЯ СУШКА<br><span style='font-size:11px; letter-spacing:2px; \
                 font-weight:normal;'>БЕСКОНЕЧНЫЙ РЕЖИМ</span></button>",
            ));
        } else {
            buttons.push_str(&format!(
                "<button id='sm-mode-{i}' style='{BUTTON_STYLE}'>{label}<br>\
                 <span style='font-size:11px; letter-spacing:2px; color:#94a3b8; \
                 font-weight:normal;'>МИНУТ</span></button>",
                label = mode.label(),
            ));
        }
    }
    format!(
        "<div style='flex:1; display:flex; flex-direction:column; justify-content:center; \
         gap:28px; text-align:center;'>\
         <div><h1 style='font-size:44px; font-style:italic; font-weight:900; margin:0;'>\
         SHAKE MASTER</h1>\
         <p style='color:#94a3b8; margin-top:6px;'>Тряси телефон, чтобы наполнить баночку!</p></div>\
         <div style='display:grid; grid-template-columns:1fr 1fr; gap:14px;'>{buttons}</div>\
         <button id='sm-open-board' style='{NAV_BUTTON_STYLE}'>🏆 Посмотреть лидеров</button>\
         </div>"
    )
}

fn playing_html() -> String {
    format!(
        "<div style='display:flex; justify-content:space-between;'>\
         <div><div style='font-size:12px; letter-spacing:3px; color:#94a3b8;'>SCORE</div>\
         <div id='sm-score' style='font-size:34px; font-weight:900; \
         font-variant-numeric:tabular-nums;'>0</div></div>\
         <div style='text-align:right;'>\
         <div style='font-size:12px; letter-spacing:3px; color:#94a3b8;'>TIME</div>\
         <div id='sm-time' style='{TIME_STYLE}'>0:00</div></div></div>\
         <div style='flex:1; display:flex; flex-direction:column; align-items:center; \
         justify-content:center;'>\
         <canvas id='sm-jar' width='280' height='360'></canvas>\
         <p style='font-size:20px; font-weight:bold; color:rgba(255,255,255,0.8); \
         margin-top:24px;'>БЫСТРЕЕ! ТРЯСИ!</p></div>\
         <button id='sm-stop' style='width:100%; padding:14px; border-radius:12px; \
         background:rgba(239,68,68,0.1); color:#ef4444; \
         border:1px solid rgba(239,68,68,0.2); font-weight:bold; cursor:pointer;'>\
         Закончить раньше</button>"
    )
}

fn result_html() -> String {
    format!(
        "<div style='flex:1; display:flex; flex-direction:column; justify-content:center; \
         gap:18px; text-align:center;'>\
         <h2 style='font-size:30px; font-weight:900; margin:0;'>СЕССИЯ ЗАВЕРШЕНА!</h2>\
         <div style='background:rgba(255,255,255,0.05); border:1px solid rgba(255,255,255,0.1); \
         padding:22px; border-radius:16px;'>\
         <div style='font-size:11px; letter-spacing:3px; color:#94a3b8;'>ФИНАЛЬНЫЙ СЧЕТ</div>\
         <div id='sm-result-score' style='font-size:48px; font-weight:900;'>0</div>\
         <div style='display:flex; justify-content:space-between; margin-top:14px; \
         padding-top:14px; border-top:1px solid rgba(255,255,255,0.05);'>\
         <span style='color:#94a3b8;'>Режим:</span>\
         <span id='sm-result-mode' style='font-weight:bold;'></span></div></div>\
         <p id='sm-flavor' style='min-height:48px; font-size:18px; font-style:italic; \
         color:#60a5fa;'></p>\
         <div><button id='sm-result-home' style='{NAV_BUTTON_STYLE} background:#ffffff; \
         color:#0f172a;'>Главное меню</button>\
         <button id='sm-result-board' style='{NAV_BUTTON_STYLE}'>Посмотреть таблицу лидеров\
         </button></div></div>"
    )
}

fn board_html() -> String {
    let mut chips = format!("<button id='sm-filter-0' style='{CHIP_SELECTED_STYLE}'>Все</button>");
    for (i, mode) in GameMode::ALL.into_iter().enumerate() {
        chips.push_str(&format!(
            "<button id='sm-filter-{idx}' style='{CHIP_STYLE}'>{label}</button>",
            idx = i + 1,
            label = mode.label(),
        ));
    }
    format!(
        "<div style='display:flex; justify-content:space-between; align-items:center; \
         margin-bottom:18px;'>\
         <h2 style='font-size:24px; font-weight:bold; margin:0;'>Лидерборд</h2>\
         <button id='sm-board-back' style='background:#334155; color:#ffffff; border:none; \
         padding:8px 16px; border-radius:8px; font-size:14px; cursor:pointer;'>Назад</button>\
         </div>\
         <div style='margin-bottom:14px; white-space:nowrap; overflow-x:auto;'>{chips}</div>\
         <div id='sm-board-list' style='flex:1; overflow-y:auto;'></div>"
    )
}

// --- Event wiring -------------------------------------------------------------

fn wire_listeners(doc: &Document) -> Result<(), JsValue> {
    for (i, mode) in GameMode::ALL.into_iter().enumerate() {
        on_click(doc, &format!("sm-mode-{i}"), move || {
            with_app(|app| {
                if app.view == View::Home {
                    start_mode(app, mode);
                }
            });
        })?;
    }
    on_click(doc, "sm-open-board", goto_board)?;
    on_click(doc, "sm-stop", || {
        with_app(|app| {
            if app.view == View::Playing {
                finish_session(app);
            }
        });
    })?;
    on_click(doc, "sm-result-home", goto_home)?;
    on_click(doc, "sm-result-board", goto_board)?;
    on_click(doc, "sm-board-back", goto_home)?;
    for i in 0..=GameMode::ALL.len() {
        on_click(doc, &format!("sm-filter-{i}"), move || {
            with_app(|app| {
                app.board_filter = (i > 0).then(|| GameMode::ALL[i - 1]);
                render_board(app);
            });
        })?;
    }
    Ok(())
}

fn goto_home() {
    with_app(|app| show_view(app, View::Home));
}

fn goto_board() {
    with_app(|app| {
        render_board(app);
        show_view(app, View::Leaderboard);
    });
}

fn on_click(doc: &Document, id: &str, handler: impl FnMut() + 'static) -> Result<(), JsValue> {
    let el = doc
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(id))?;
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut()>);
    el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    // App-lifetime listener; intentionally leaked.
    closure.forget();
    Ok(())
}

// --- Small DOM helpers --------------------------------------------------------

fn document() -> Option<Document> {
    window()?.document()
}

fn element_by_id(id: &str) -> Option<web_sys::Element> {
    document()?.get_element_by_id(id)
}

fn set_text(id: &str, text: &str) {
    if let Some(el) = element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

fn set_inner_html(id: &str, html: &str) {
    if let Some(el) = element_by_id(id) {
        el.set_inner_html(html);
    }
}

/// Usernames come from the host platform and end up in `innerHTML`.
fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
