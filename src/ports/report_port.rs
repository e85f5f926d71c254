//! Report generation port trait.

use crate::domain::error::PortoptError;
use crate::domain::simulation::SimulationRun;

/// Port for writing a simulation report.
pub trait ReportPort {
    fn write(&self, run: &SimulationRun, output_path: &str) -> Result<(), PortoptError>;
}
