//! Screen composition: draws the current state onto any `Surface`.

use crate::domain::entity::{BALL_SIZE, PADDLE_H, PADDLE_W};
use crate::domain::physics::{FIELD_H, FIELD_W};
use crate::sim::layout;
use crate::sim::world::{GameState, Session, WorldState};
use super::surface::{Rgb, Surface};

const HINT: Rgb = Rgb::new(120, 120, 120);

pub fn draw_world(s: &mut impl Surface, w: &WorldState) {
    match &w.state {
        GameState::SelectName => draw_select_name(s, w),
        GameState::EnterName => draw_enter_name(s, w),
        GameState::Countdown(session) => {
            s.big_digit(FIELD_W / 2.0, FIELD_H / 2.0, session.countdown_shown(), Rgb::BLACK);
        }
        GameState::Playing(session) => draw_playing(s, w, session),
        GameState::GameOver(session) => draw_game_over(s, w, session),
    }
}

fn best_line(w: &WorldState) -> String {
    format!("Best: {:.2} by {}", w.best.time, w.best.holder)
}

fn draw_select_name(s: &mut impl Surface, w: &WorldState) {
    s.text_centered(FIELD_W / 2.0, FIELD_H / 2.0 + 150.0, "Select Your Name:", Rgb::BLACK);
    if w.players.is_empty() {
        s.text_centered(FIELD_W / 2.0, FIELD_H / 2.0 + 100.0, "No saved names yet", HINT);
    }
    for (index, name) in w.players.names().iter().enumerate() {
        layout::name_button(index, name).draw(s);
        layout::delete_button(index).draw(s);
    }
    layout::new_name_button().draw(s);

    s.text_centered(FIELD_W / 2.0, 40.0, &best_line(w), HINT);
    s.text_centered(FIELD_W / 2.0, 15.0, "Click to choose   ESC: Quit", HINT);
}

fn draw_enter_name(s: &mut impl Surface, w: &WorldState) {
    s.text_centered(FIELD_W / 2.0, FIELD_H / 2.0 + 100.0, "Enter Your Name:", Rgb::BLACK);
    s.text_centered(FIELD_W / 2.0, FIELD_H / 2.0 + 50.0, &w.player_name, Rgb::BLACK);
    for button in w.keyboard.buttons() {
        button.draw(s);
    }
}

fn draw_playing(s: &mut impl Surface, w: &WorldState, session: &Session) {
    let p = &session.paddle;
    s.fill_rect(p.x, p.y, PADDLE_W, PADDLE_H, Rgb::BLUE);
    let b = &session.ball;
    s.fill_circle(b.x, b.y, BALL_SIZE / 2.0, Rgb::RED);

    s.text(10.0, FIELD_H - 30.0, &format!("Time: {:.2}", session.elapsed), Rgb::BLACK);
    s.text(10.0, FIELD_H - 60.0, &best_line(w), Rgb::BLACK);
}

fn draw_game_over(s: &mut impl Surface, w: &WorldState, session: &Session) {
    let cx = FIELD_W / 2.0;
    let cy = FIELD_H / 2.0;
    s.text_centered(cx, cy + 40.0, "GAME OVER!", Rgb::RED_DEVIL);
    s.text_centered(cx, cy - 10.0, "Press ENTER to Restart", Rgb::ORANGE);
    s.text_centered(cx, cy - 60.0, &format!("Your Time: {:.2}", session.elapsed), Rgb::BLACK);
    s.text_centered(cx, cy - 100.0, &best_line(w), Rgb::BLACK);
}
