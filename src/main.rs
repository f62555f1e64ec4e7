use gtk4::prelude::*;
use gtk4::{gdk, glib};
use gtk4::{
    Application, ApplicationWindow, DrawingArea, EventControllerKey, EventControllerScroll,
    EventControllerScrollFlags, GestureDrag,
};
use std::cell::RefCell;
use std::rc::Rc;

pub mod builtins;
pub mod catalog;
pub mod config;
pub mod io;
pub mod model;
pub mod rendering;
pub mod utils;

use config::Config;
use rendering::{InputEvent, Scene};

fn main() {
    if let Err(e) = utils::logger::init() {
        eprintln!("molview: could not install logger: {}", e);
    }

    let app = Application::builder()
        .application_id("com.example.molview")
        .build();

    app.connect_activate(build_ui);
    app.run();
}

fn build_ui(app: &Application) {
    let mut config = Config::load();
    utils::logger::set_verbose(config.verbose);

    let molecules = match catalog::load(&mut config) {
        Ok(m) => m,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let scene = match Scene::new(config, molecules) {
        Ok(s) => s,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    let scene = Rc::new(RefCell::new(scene));

    let window = ApplicationWindow::builder()
        .application(app)
        .title("Molecule")
        .default_width(800)
        .default_height(600)
        .build();

    let drawing_area = DrawingArea::new();
    drawing_area.set_vexpand(true);
    drawing_area.set_hexpand(true);
    window.set_child(Some(&drawing_area));

    let s = scene.clone();
    drawing_area.connect_resize(move |_, w, h| {
        s.borrow_mut().reshape(w as f64, h as f64);
    });

    let s = scene.clone();
    drawing_area.set_draw_func(move |_, cr, _, _| {
        s.borrow_mut().draw(cr);
    });

    setup_interactions(&window, &drawing_area, scene.clone());

    // One animation step per frame clock tick.
    let s = scene.clone();
    drawing_area.add_tick_callback(move |da, _clock| {
        s.borrow_mut().tick();
        da.queue_draw();
        glib::ControlFlow::Continue
    });

    window.present();
}

fn setup_interactions(
    window: &ApplicationWindow,
    drawing_area: &DrawingArea,
    scene: Rc<RefCell<Scene>>,
) {
    // Pointer drags feed the trackball.
    let drag = GestureDrag::new();

    let s = scene.clone();
    let da = drawing_area.clone();
    drag.connect_drag_begin(move |_, x, y| {
        s.borrow_mut().handle_event(InputEvent::ButtonPress { x, y });
        da.queue_draw();
    });

    let s = scene.clone();
    let da = drawing_area.clone();
    drag.connect_drag_update(move |gesture, dx, dy| {
        if let Some((sx, sy)) = gesture.start_point() {
            s.borrow_mut().handle_event(InputEvent::Motion {
                x: sx + dx,
                y: sy + dy,
            });
            da.queue_draw();
        }
    });

    let s = scene.clone();
    drag.connect_drag_end(move |_, _, _| {
        s.borrow_mut().handle_event(InputEvent::ButtonRelease);
    });
    drawing_area.add_controller(drag);

    // Wheel rolls the scene a step at a time.
    let scroll = EventControllerScroll::new(EventControllerScrollFlags::VERTICAL);
    let s = scene.clone();
    let da = drawing_area.clone();
    scroll.connect_scroll(move |_, _, dy| {
        s.borrow_mut().handle_event(InputEvent::Scroll { up: dy < 0.0 });
        da.queue_draw();
        glib::Propagation::Stop
    });
    drawing_area.add_controller(scroll);

    let key_controller = EventControllerKey::new();
    let s = scene.clone();
    let da = drawing_area.clone();
    let win = window.clone();
    key_controller.connect_key_pressed(move |_, keyval, _keycode, _state| {
        if keyval == gdk::Key::Escape || keyval == gdk::Key::q {
            win.close();
            return glib::Propagation::Stop;
        }
        let consumed = s.borrow_mut().handle_event(InputEvent::KeyPress {
            ch: keyval.to_unicode(),
        });
        if consumed {
            da.queue_draw();
            glib::Propagation::Stop
        } else {
            glib::Propagation::Proceed
        }
    });
    window.add_controller(key_controller);
}
