use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SwarmConfig;
use crate::error::Result;
use crate::node::{NodeGraph, NodeId};

//
// ──────────────────────────────────────────────────────────────
//   Constants
// ──────────────────────────────────────────────────────────────
//

const SPRING_CONSTANT: f32 = 0.1;
const MAX_VELOCITY: f32 = 30.0;

const LIGHT_ORBIT_RADIUS: f32 = 10.0;
const LIGHT_ORBIT_SPEED: f32 = 0.5; // radians per second

const PARTICLE_BLUE: f32 = 150.0 / 255.0;

//
// ──────────────────────────────────────────────────────────────
//   Swarm
//
//   Particles live in the swarm node's local space and are pulled
//   back toward its origin by a spring. The light is a child node
//   circling the origin, so anything parented to it moves too.
// ──────────────────────────────────────────────────────────────
//

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle
{
  pub position: Vec3,
  pub velocity: Vec3,
  pub color: [f32; 3],
}

#[derive(Clone, Debug)]
pub struct Swarm
{
  pub node: NodeId,
  pub light: NodeId,
  particles: Vec<Particle>,
}

impl Swarm
{
  pub fn new(nodes: &mut NodeGraph, config: &SwarmConfig) -> Result<Self>
  {
    let node = nodes.add("swarm");
    let light = nodes.add("swarm.light");
    nodes.set_parent(light, node)?;
    nodes.set_position(light, light_offset(0.0))?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let particles = (0..config.particles)
      .map(|_| Particle {
        position: random_spread(&mut rng, config.position_dispersion),
        velocity: random_spread(&mut rng, config.velocity_dispersion),
        color: [rng.gen::<f32>(), rng.gen::<f32>(), PARTICLE_BLUE],
      })
      .collect();

    Ok(Self { node, light, particles })
  }

  pub fn particles(&self) -> &[Particle]
  {
    &self.particles
  }

  /// Advance the simulation by `dt` seconds; `elapsed` drives the light.
  pub fn update(&mut self, nodes: &mut NodeGraph, dt: f32, elapsed: f32) -> Result<()>
  {
    for p in &mut self.particles
    {
      p.velocity -= SPRING_CONSTANT * p.position * dt;
      p.velocity = p.velocity.clamp_length_max(MAX_VELOCITY);
      p.position += p.velocity * dt;
    }

    nodes.set_position(self.light, light_offset(elapsed))
  }

  /// Particle positions in world space.
  pub fn world_positions(&self, nodes: &NodeGraph) -> Result<Vec<Vec3>>
  {
    let to_world = nodes.global_matrix(self.node)?;
    Ok(self.particles.iter().map(|p| to_world.transform_point3(p.position)).collect())
  }

  pub fn light_position(&self, nodes: &NodeGraph) -> Result<Vec3>
  {
    nodes.global_position(self.light)
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Helpers
// ──────────────────────────────────────────────────────────────
//

fn random_spread(rng: &mut StdRng, dispersion: f32) -> Vec3
{
  Vec3::new(
    (rng.gen::<f32>() - 0.5) * dispersion,
    (rng.gen::<f32>() - 0.5) * dispersion,
    (rng.gen::<f32>() - 0.5) * dispersion,
  )
}

fn light_offset(elapsed: f32) -> Vec3
{
  let angle = elapsed * LIGHT_ORBIT_SPEED;
  Vec3::new(angle.cos() * LIGHT_ORBIT_RADIUS, 0.0, angle.sin() * LIGHT_ORBIT_RADIUS)
}

#[cfg(test)]
mod tests
{
  use super::*;

  fn config(particles: usize) -> SwarmConfig
  {
    SwarmConfig { particles, ..SwarmConfig::default() }
  }

  #[test]
  fn particles_start_inside_dispersion_box()
  {
    let mut nodes = NodeGraph::new();
    let cfg = config(500);
    let swarm = Swarm::new(&mut nodes, &cfg).unwrap();

    let half = cfg.position_dispersion / 2.0;
    assert_eq!(swarm.particles().len(), 500);
    assert!(swarm.particles().iter().all(|p| p.position.abs().max_element() <= half));
    assert!(swarm.particles().iter().all(|p| p.color[2] == PARTICLE_BLUE));
  }

  #[test]
  fn same_seed_same_swarm()
  {
    let a = Swarm::new(&mut NodeGraph::new(), &config(20)).unwrap();
    let b = Swarm::new(&mut NodeGraph::new(), &config(20)).unwrap();

    assert_eq!(a.particles(), b.particles());
  }

  #[test]
  fn velocity_never_exceeds_limit()
  {
    let mut nodes = NodeGraph::new();
    let cfg = SwarmConfig { velocity_dispersion: 500.0, ..config(50) };
    let mut swarm = Swarm::new(&mut nodes, &cfg).unwrap();

    for step in 0..100
    {
      swarm.update(&mut nodes, 1.0 / 60.0, step as f32 / 60.0).unwrap();
    }

    assert!(swarm.particles().iter().all(|p| p.velocity.length() <= MAX_VELOCITY + 1e-3));
  }

  #[test]
  fn spring_pulls_toward_origin()
  {
    let mut nodes = NodeGraph::new();
    let mut swarm = Swarm::new(&mut nodes, &config(1)).unwrap();
    swarm.particles[0].position = Vec3::new(10.0, 0.0, 0.0);
    swarm.particles[0].velocity = Vec3::ZERO;

    swarm.update(&mut nodes, 0.1, 0.0).unwrap();

    assert!(swarm.particles[0].velocity.x < 0.0);
    assert!(swarm.particles[0].position.x < 10.0);
  }

  #[test]
  fn light_circles_the_swarm()
  {
    let mut nodes = NodeGraph::new();
    let mut swarm = Swarm::new(&mut nodes, &config(1)).unwrap();
    nodes.set_position(swarm.node, Vec3::new(0.0, 5.0, 0.0)).unwrap();

    for t in [0.0, 1.0, 2.5, 10.0]
    {
      swarm.update(&mut nodes, 0.0, t).unwrap();
      let offset = swarm.light_position(&nodes).unwrap() - Vec3::new(0.0, 5.0, 0.0);

      assert!((offset.length() - LIGHT_ORBIT_RADIUS).abs() < 1e-4);
      assert!(offset.y.abs() < 1e-5);
    }
  }
}
