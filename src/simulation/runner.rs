//! Simulation runner implementation.

use std::fmt;

use tracing::{debug, info, warn};

use crate::boundary::BoundaryTable;
use crate::config::SimulationConfig;
use crate::error::{AdvectionError, Result};
use crate::fe::NodalBasis;
use crate::flux::NumericalFlux;
use crate::io::OutputSink;
use crate::mesh::{MeshGeometry, QuadMesh};
use crate::operators::OperatorArena;
use crate::solver::{DoubleBuffer, Solution};
use crate::time::{AdvectionRhsConfig, TimeScheme, stable_time_step};
use crate::wind::{UniformWind, WindField};

/// Point data name used for snapshots.
const FIELD_NAME: &str = "phi";

// =============================================================================
// Simulation State
// =============================================================================

/// Lifecycle state of a [`Simulation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationState {
    /// Mesh and order are set, operators are not built.
    Unconfigured,
    /// Operators are built and the initial condition can be set.
    OperatorsBuilt,
    /// At least one step has been taken.
    Stepping,
    /// No further steps are allowed until reconfiguration.
    Finalized,
}

impl fmt::Display for SimulationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SimulationState::Unconfigured => "unconfigured",
            SimulationState::OperatorsBuilt => "operators built",
            SimulationState::Stepping => "stepping",
            SimulationState::Finalized => "finalized",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Run Summary
// =============================================================================

/// Statistics of a completed [`Simulation::run`].
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    /// Simulation time reached.
    pub final_time: f64,
    /// Number of steps taken during the run.
    pub n_steps: usize,
    /// Number of snapshots handed to the sink.
    pub n_outputs: usize,
    /// Total mass before the first step.
    pub initial_mass: f64,
    /// Total mass after the last step.
    pub final_mass: f64,
}

// =============================================================================
// Simulation
// =============================================================================

/// One advection problem: mesh, basis, wind, boundary table and the state
/// needed to step it.
pub struct Simulation<M: MeshGeometry, W: WindField> {
    mesh: M,
    basis: NodalBasis,
    wind: W,
    boundaries: BoundaryTable,
    flux: NumericalFlux,
    scheme: TimeScheme,
    output_interval: Option<usize>,
    operators: Option<OperatorArena>,
    buffers: Option<DoubleBuffer>,
    state: SimulationState,
    time: f64,
    n_steps: usize,
}

impl<W: WindField> Simulation<QuadMesh, W> {
    /// Unit-square problem described by `config`, with `wind` in place of the
    /// configured constant wind.
    pub fn from_config_with_wind(
        config: &SimulationConfig,
        wind: W,
        boundaries: BoundaryTable,
    ) -> Result<Self> {
        config.validate()?;
        let mesh = QuadMesh::unit_square(config.refinements)?;
        let mut sim = Simulation::new(mesh, config.order, wind, boundaries)?
            .with_flux(config.flux)
            .with_scheme(config.scheme);
        sim.output_interval = config.output_interval;
        Ok(sim)
    }
}

impl Simulation<QuadMesh, UniformWind> {
    /// Unit-square problem described by `config`.
    pub fn from_config(config: &SimulationConfig, boundaries: BoundaryTable) -> Result<Self> {
        Self::from_config_with_wind(config, config.wind, boundaries)
    }
}

impl<M: MeshGeometry, W: WindField> Simulation<M, W> {
    /// Create an unconfigured simulation.
    ///
    /// Fails if `order` is out of range or the boundary table lacks a
    /// function for a tag used by `mesh`.
    pub fn new(mesh: M, order: usize, wind: W, boundaries: BoundaryTable) -> Result<Self> {
        let basis = NodalBasis::new(order)?;
        boundaries.validate(&mesh)?;
        Ok(Self {
            mesh,
            basis,
            wind,
            boundaries,
            flux: NumericalFlux::default(),
            scheme: TimeScheme::default(),
            output_interval: None,
            operators: None,
            buffers: None,
            state: SimulationState::Unconfigured,
            time: 0.0,
            n_steps: 0,
        })
    }

    /// Set the numerical flux.
    pub fn with_flux(mut self, flux: NumericalFlux) -> Self {
        self.flux = flux;
        self
    }

    /// Set the time integration scheme.
    pub fn with_scheme(mut self, scheme: TimeScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Write a snapshot every `steps` steps during [`run`](Self::run).
    pub fn with_output_interval(mut self, steps: usize) -> Self {
        self.output_interval = Some(steps);
        self
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    /// Current simulation time.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Steps taken since the operators were built.
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    pub fn mesh(&self) -> &M {
        &self.mesh
    }

    pub fn basis(&self) -> &NodalBasis {
        &self.basis
    }

    /// Built operators, if any.
    pub fn operators(&self) -> Option<&OperatorArena> {
        self.operators.as_ref()
    }

    /// Latest solution, once operators are built.
    pub fn solution(&self) -> Option<&Solution> {
        self.buffers.as_ref().map(DoubleBuffer::previous)
    }

    /// Build the local operators of every cell.
    ///
    /// The solution starts at zero; use
    /// [`set_initial_condition`](Self::set_initial_condition) to change it.
    pub fn build_operators(&mut self) -> Result<()> {
        self.require(&[SimulationState::Unconfigured], "build operators")?;

        let arena = OperatorArena::build(&self.mesh, &self.basis, &self.wind)?;
        let initial = Solution::new(self.mesh.n_cells(), self.basis.dofs_per_cell());
        self.operators = Some(arena);
        self.buffers = Some(DoubleBuffer::new(initial));
        self.time = 0.0;
        self.n_steps = 0;
        self.state = SimulationState::OperatorsBuilt;
        Ok(())
    }

    /// Interpolate `f` at the support points as the initial condition.
    pub fn set_initial_condition<F>(&mut self, f: F) -> Result<()>
    where
        F: Fn(f64, f64) -> f64,
    {
        self.require(&[SimulationState::OperatorsBuilt], "set the initial condition")?;
        let initial = Solution::interpolate(&self.mesh, &self.basis, f);
        self.buffers = Some(DoubleBuffer::new(initial));
        Ok(())
    }

    /// Advance the solution by `dt`.
    ///
    /// On error the stored solution, time and state are left as they were.
    pub fn step(&mut self, dt: f64) -> Result<()> {
        self.require(
            &[SimulationState::OperatorsBuilt, SimulationState::Stepping],
            "step",
        )?;
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(AdvectionError::config(format!(
                "time step must be positive and finite, got {}",
                dt
            )));
        }

        let (Some(arena), Some(buffers)) = (self.operators.as_ref(), self.buffers.as_mut()) else {
            return Err(AdvectionError::config("operators are missing"));
        };

        let config = AdvectionRhsConfig::new(arena, &self.boundaries).with_flux(self.flux);
        let next = self
            .scheme
            .step(buffers.previous(), &self.mesh, &config, dt)?;
        buffers.store(next);
        buffers.swap();

        self.time += dt;
        self.n_steps += 1;
        self.state = SimulationState::Stepping;
        Ok(())
    }

    /// Stop stepping. The final solution stays readable.
    pub fn finalize(&mut self) -> Result<()> {
        self.require(
            &[SimulationState::OperatorsBuilt, SimulationState::Stepping],
            "finalize",
        )?;
        self.state = SimulationState::Finalized;
        info!(time = self.time, steps = self.n_steps, "simulation finalized");
        Ok(())
    }

    /// Replace the mesh and order, discarding operators and solution.
    ///
    /// Allowed from any state; the simulation returns to
    /// [`SimulationState::Unconfigured`].
    pub fn reconfigure(&mut self, mesh: M, order: usize) -> Result<()> {
        let basis = NodalBasis::new(order)?;
        self.boundaries.validate(&mesh)?;
        self.mesh = mesh;
        self.basis = basis;
        self.operators = None;
        self.buffers = None;
        self.time = 0.0;
        self.n_steps = 0;
        self.state = SimulationState::Unconfigured;
        Ok(())
    }

    /// Step to `t_final` with step `dt`, writing snapshots to `sink`.
    ///
    /// Builds the operators first if needed. The last step is shortened to
    /// land on `t_final`. Snapshots are written before the first step, every
    /// output interval, and after the last step; then the simulation is
    /// finalized.
    pub fn run<S: OutputSink>(&mut self, t_final: f64, dt: f64, sink: &mut S) -> Result<RunSummary> {
        if self.state == SimulationState::Unconfigured {
            self.build_operators()?;
        }
        self.require(
            &[SimulationState::OperatorsBuilt, SimulationState::Stepping],
            "run",
        )?;
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(AdvectionError::config(format!(
                "time step must be positive and finite, got {}",
                dt
            )));
        }

        let order = self.basis.order();
        if !self.scheme.is_cfl_stable(order) {
            warn!(
                scheme = ?self.scheme,
                order,
                "scheme is unstable at any fixed CFL number for this order, the run may blow up"
            );
        } else {
            let dt_stable = stable_time_step(&self.mesh, &self.wind, order, 1.0);
            if dt > dt_stable {
                warn!(
                    dt,
                    dt_stable, "time step exceeds the CFL estimate, the run may blow up"
                );
            }
        }

        let initial_mass = self.current()?.total_mass(&self.mesh, &self.basis)?;
        info!(
            cells = self.mesh.n_cells(),
            order = self.basis.order(),
            t_start = self.time,
            t_final,
            dt,
            "starting run"
        );

        let mut n_outputs = 0;
        self.write_snapshot(sink)?;
        n_outputs += 1;

        let tol = 1e-12 * t_final.abs().max(1.0);
        let mut n_steps = 0;
        let mut last_written = true;
        while t_final - self.time > tol {
            let step_dt = dt.min(t_final - self.time);
            self.step(step_dt)?;
            n_steps += 1;
            last_written = false;

            if let Some(interval) = self.output_interval
                && n_steps % interval == 0
            {
                self.write_snapshot(sink)?;
                n_outputs += 1;
                last_written = true;
            }

            if n_steps % 100 == 0 {
                info!(step = n_steps, time = self.time, "progress");
            }
        }

        if !last_written {
            self.write_snapshot(sink)?;
            n_outputs += 1;
        }

        let final_mass = self.current()?.total_mass(&self.mesh, &self.basis)?;
        self.finalize()?;

        Ok(RunSummary {
            final_time: self.time,
            n_steps,
            n_outputs,
            initial_mass,
            final_mass,
        })
    }

    fn current(&self) -> Result<&Solution> {
        self.solution()
            .ok_or_else(|| AdvectionError::config("no solution: operators are not built"))
    }

    fn write_snapshot<S: OutputSink>(&self, sink: &mut S) -> Result<()> {
        let solution = self.current()?;
        sink.write(&self.mesh, &self.basis, solution, FIELD_NAME)?;
        debug!(time = self.time, step = self.n_steps, "snapshot written");
        Ok(())
    }

    fn require(&self, allowed: &[SimulationState], action: &str) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(AdvectionError::config(format!(
                "cannot {} in state '{}'",
                action, self.state
            )))
        }
    }
}

impl<M: MeshGeometry + fmt::Debug, W: WindField> fmt::Debug for Simulation<M, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("mesh", &self.mesh)
            .field("order", &self.basis.order())
            .field("boundaries", &self.boundaries)
            .field("flux", &self.flux)
            .field("scheme", &self.scheme)
            .field("state", &self.state)
            .field("time", &self.time)
            .field("n_steps", &self.n_steps)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::OutputError;

    /// Sink that keeps every snapshot in memory.
    #[derive(Default)]
    struct RecordingSink {
        snapshots: Vec<Solution>,
    }

    impl OutputSink for RecordingSink {
        fn write<G: MeshGeometry>(
            &mut self,
            _mesh: &G,
            _basis: &NodalBasis,
            solution: &Solution,
            field_name: &str,
        ) -> std::result::Result<(), OutputError> {
            assert_eq!(field_name, "phi");
            self.snapshots.push(solution.clone());
            Ok(())
        }
    }

    fn create_test_simulation() -> Simulation<QuadMesh, UniformWind> {
        let mesh = QuadMesh::unit_square(2).unwrap();
        Simulation::new(
            mesh,
            1,
            UniformWind::new(1.0, 0.5),
            BoundaryTable::unit_square_default(),
        )
        .unwrap()
    }

    #[test]
    fn test_step_before_build_fails() {
        let mut sim = create_test_simulation();
        assert_eq!(sim.state(), SimulationState::Unconfigured);
        assert!(matches!(sim.step(0.01), Err(AdvectionError::Configuration(_))));
        assert!(sim.finalize().is_err());
        assert!(sim.solution().is_none());
    }

    #[test]
    fn test_state_transitions() {
        let mut sim = create_test_simulation();

        sim.build_operators().unwrap();
        assert_eq!(sim.state(), SimulationState::OperatorsBuilt);
        assert!(sim.build_operators().is_err());
        assert_eq!(sim.operators().unwrap().n_cells(), 16);

        sim.step(0.01).unwrap();
        sim.step(0.01).unwrap();
        assert_eq!(sim.state(), SimulationState::Stepping);
        assert_eq!(sim.n_steps(), 2);
        assert!((sim.time() - 0.02).abs() < 1e-15);
        assert!(sim.set_initial_condition(|_, _| 1.0).is_err());

        sim.finalize().unwrap();
        assert_eq!(sim.state(), SimulationState::Finalized);
        assert!(sim.step(0.01).is_err());
        assert!(sim.solution().is_some());

        sim.reconfigure(QuadMesh::unit_square(1).unwrap(), 2).unwrap();
        assert_eq!(sim.state(), SimulationState::Unconfigured);
        assert!(sim.operators().is_none());
        assert_eq!(sim.basis().order(), 2);
        sim.build_operators().unwrap();
        assert_eq!(sim.solution().unwrap().len(), 4 * 9);
    }

    #[test]
    fn test_reconfigure_checks_order() {
        let mut sim = create_test_simulation();
        assert!(sim.reconfigure(QuadMesh::unit_square(1).unwrap(), 11).is_err());
        assert_eq!(sim.basis().order(), 1);
    }

    #[test]
    fn test_missing_boundary_function_rejected() {
        let mesh = QuadMesh::unit_square(1).unwrap();
        let result = Simulation::new(mesh, 1, UniformWind::new(1.0, 0.0), BoundaryTable::new());
        assert!(matches!(result, Err(AdvectionError::Configuration(_))));
    }

    #[test]
    fn test_bad_time_step_rejected() {
        let mut sim = create_test_simulation();
        sim.build_operators().unwrap();
        assert!(sim.step(0.0).is_err());
        assert!(sim.step(f64::NAN).is_err());
        assert_eq!(sim.state(), SimulationState::OperatorsBuilt);
    }

    #[test]
    fn test_run_outputs() {
        let mut sim = create_test_simulation().with_output_interval(2);
        let mut sink = RecordingSink::default();

        // 0.1 / 0.025 = 4 steps, snapshots at 0, 2, 4
        let summary = sim.run(0.1, 0.025, &mut sink).unwrap();
        assert_eq!(summary.n_steps, 4);
        assert_eq!(summary.n_outputs, 3);
        assert_eq!(sink.snapshots.len(), 3);
        assert!((summary.final_time - 0.1).abs() < 1e-12);
        assert_eq!(sim.state(), SimulationState::Finalized);

        // Inflow of 1 through x-min raises the solution from zero
        assert!(sink.snapshots[0].max_abs() == 0.0);
        assert!(sink.snapshots[2].max() > 0.0);
        assert!(summary.final_mass > summary.initial_mass);
    }

    #[test]
    fn test_run_shortens_last_step() {
        let mut sim = create_test_simulation();
        let mut sink = RecordingSink::default();

        let summary = sim.run(0.05, 0.02, &mut sink).unwrap();
        assert_eq!(summary.n_steps, 3);
        assert!((sim.time() - 0.05).abs() < 1e-14);
        // Initial and final snapshots only
        assert_eq!(summary.n_outputs, 2);
    }

    #[test]
    fn test_run_after_finalize_fails() {
        let mut sim = create_test_simulation();
        let mut sink = RecordingSink::default();
        sim.run(0.01, 0.01, &mut sink).unwrap();
        assert!(sim.run(0.02, 0.01, &mut sink).is_err());
    }

    #[test]
    fn test_default_config_run_stays_bounded() {
        let config = SimulationConfig::new(2, 3).with_t_final(0.5);
        let mut sim =
            Simulation::from_config(&config, BoundaryTable::unit_square_default()).unwrap();
        let dt = config.time_step(sim.mesh());
        let mut sink = RecordingSink::default();
        let summary = sim.run(config.t_final, dt, &mut sink).unwrap();
        assert!(summary.n_steps > 10);

        let phi = sim.solution().unwrap();
        assert!(phi.max() < 1.5, "max {}", phi.max());
        assert!(phi.min() > -0.5, "min {}", phi.min());
        assert!(phi.max() > 0.5, "inflow did not enter the domain");
    }

    #[test]
    fn test_from_config() {
        let config = SimulationConfig::new(2, 1)
            .with_scheme(TimeScheme::SspRk3)
            .with_flux(NumericalFlux::LaxFriedrichs);
        let mut sim = Simulation::from_config(&config, BoundaryTable::uniform(1.0)).unwrap();
        sim.build_operators().unwrap();
        sim.set_initial_condition(|_, _| 1.0).unwrap();
        sim.step(config.time_step(sim.mesh())).unwrap();

        for &v in &sim.solution().unwrap().data {
            assert!((v - 1.0).abs() < 1e-12);
        }
    }
}
