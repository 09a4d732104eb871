use glam::Vec2;
use tilesweep::*;

const MAP: &str = "
    1111111111
    1000000001
    1000000001
    1000220001
    1000000001
    1111111111";

fn main() {
    let grid = match TileGrid::from_codes(10, 6, 16.0, MAP) {
        Ok(grid) => grid,
        Err(err) => {
            eprintln!("bad map: {err}");
            return;
        }
    };
    print!("{grid}");

    let room = grid.bounds();
    let resolver = TileResolver::new(SweepConfig::default());
    let mut player = Mover::new(Rect::new(24.0, 20.0, 7.0, 12.0)).with_one_way(OneWayMode::PassFromBelow);
    let mut camera = Rect::new(0.0, 0.0, 96.0, 64.0);
    let dt = 16.0;

    for tick in 0..240 {
        // Run right, jump once, then run back left.
        let run = if tick < 150 { 0.09 } else { -0.09 };
        let target = Vec2::new(run, player.velocity.y);
        player.steer(target, 0.01, dt);
        player.velocity.y = (player.velocity.y + 0.0005 * dt).min(0.4);
        if tick == 60 {
            player.velocity.y = -0.3;
        }

        let res = advance(&mut player, dt, &grid, &resolver);
        player.clamp_to(&room);
        camera = follow_camera(camera, player.rect, room);

        if tick % 10 == 0 || (res.hit_anything() && tick % 5 == 0) {
            println!(
                "tick={tick:3} pos=({:6.2},{:6.2}) vel=({:+.3},{:+.3}) last_tile={} tested={} camera=({:.1},{:.1})",
                player.rect.x, player.rect.y, player.velocity.x, player.velocity.y,
                res.last_tile, res.tiles_tested, camera.x, camera.y
            );
        }
    }
}
