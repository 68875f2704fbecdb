use pool::{entity::EntityHandle, manager::PoolManager};

use crate::{
    config::SandboxConfig,
    world::{PROJECTILE, SPARK, SandboxWorld},
};

mod config;
mod world;

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_timed();
    log::info!("Starting pool sandbox...");

    let config = SandboxConfig::load()?;
    let mut world = SandboxWorld::new();
    let mut pool = PoolManager::new(config.pool.clone());

    // Pre-warm the projectile pool; sparks grow on demand.
    pool.add_capacity(&mut world, PROJECTILE, 3)?;

    let mut in_flight: Vec<EntityHandle> = Vec::new();
    for frame in 0..config.frames {
        if frame % 5 == 0 {
            in_flight.push(pool.acquire(&mut world, PROJECTILE)?);
        }
        if frame % 2 == 0 {
            in_flight.push(pool.acquire(&mut world, SPARK)?);
        }

        for handle in world.tick() {
            if let Err(err) = pool.release(&mut world, handle) {
                log::warn!("Failed to release {handle}: {err}");
            }
            in_flight.retain(|&held| held != handle);
        }

        // Simulate an out-of-band kill now and then; the world raises the
        // destruction signal, which we route straight to the pool.
        if frame % 17 == 16 {
            if let Some(&victim) = in_flight.first() {
                if world.force_destroy(victim) {
                    pool.on_instance_destroyed(&mut world, victim);
                }
                in_flight.retain(|&held| held != victim);
            }
        }
    }

    // Level-transition style cleanup.
    pool.reset_all_of_type(&mut world, SPARK);
    pool.reset_all_of_type(&mut world, PROJECTILE);

    let stats = pool.statistics();
    log::info!(
        "After {} frames: {} entities in world, {} pool slots ({} busy)",
        config.frames,
        world.entity_count(),
        stats.total_slots,
        stats.busy_slots
    );
    for line in pool.debug_dump().lines() {
        log::info!("{line}");
    }

    Ok(())
}
