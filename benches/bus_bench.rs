// Benchmark for the display bus protocol and frame rendering
// Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};
use sketchboard::arduino::{A4, A5, Arduino, LiquidCrystalI2c};
use sketchboard::config::{Config, TerminationPolicy};
use sketchboard::geometry::Rgba;
use sketchboard::platform::HeadlessPlatform;
use sketchboard::Simulation;

fn simulation() -> Simulation {
    let mut config = Config::default();
    config.scheduler.termination = TerminationPolicy::Halt;
    config.random.seed = Some(1);
    Simulation::new(config, Box::new(HeadlessPlatform::new())).unwrap()
}

fn bench_lcd_print(c: &mut Criterion) {
    let mut sim = simulation();
    sim.connect_lcd(0x27, A4, A5, 16, 2, 0, 0).unwrap();
    let lcd = LiquidCrystalI2c::new(0x27, 16, 2);
    c.bench_function("lcd clear + print 32 chars", |b| {
        b.iter(|| {
            let mut hw = Arduino::new(&mut sim);
            lcd.clear(&mut hw);
            lcd.set_cursor(&mut hw, 0, 0);
            lcd.print(&mut hw, "the quick brown fox jumps over t");
        });
    });
}

fn bench_frame(c: &mut Criterion) {
    let mut sim = simulation();
    for (i, pin) in [3u8, 4, 5, 6].into_iter().enumerate() {
        sim.connect_led(pin, 64 * i as i32, 0, Rgba::BLACK, Rgba::WHITE).unwrap();
        sim.connect_button(pin + 4, 64 * i as i32, 64).unwrap();
    }
    sim.connect_lcd(0x27, A4, A5, 16, 2, 0, 128).unwrap();
    c.bench_function("poll + render (8 devices + 16x2 lcd)", |b| {
        b.iter(|| {
            sim.poll_input();
            sim.render_frame();
        });
    });
}

criterion_group!(benches, bench_lcd_print, bench_frame);
criterion_main!(benches);
