// main.rs

// hides console on release
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use log::{error, info};
use macroquad::window::Conf;

use chaos_replay::config::SimConfig;
use chaos_replay::integrator::integrate;
use chaos_replay::playback::{self, PlaybackLoop};
use chaos_replay::render::{MacroquadCanvas, MacroquadEvents};
use chaos_replay::Result;

fn window_conf() -> Conf {
    let window = SimConfig::default().window;
    Conf {
        window_title: window.title,
        window_width: window.width as i32,
        window_height: window.height as i32,
        ..Default::default()
    }
}

async fn run(config: SimConfig) -> Result<()> {
    config.validate()?;

    // no point simulating anything without somewhere to show it
    let mut canvas = MacroquadCanvas::create(&config.window).await?;
    let (width, height) = canvas.size();
    info!("drawing surface ready, {}x{}", width, height);

    info!(
        "integrating {} samples over {} s from {:?}",
        config.span.samples, config.span.t_end, config.initial
    );
    let trajectory = integrate(&config.params, config.initial, config.span, &config.tolerances)?;

    let player = PlaybackLoop::from_config(&config, trajectory, width, height);
    playback::run(player, &mut canvas, &mut MacroquadEvents, &config.playback).await;

    Ok(())
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(SimConfig::default()).await {
        error!("{}", e);
        std::process::exit(1);
    }
}
