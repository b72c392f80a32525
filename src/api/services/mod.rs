//! One service per backend resource.
//!
//! Services borrow the client, so `client.phases().by_forage(3)` reads the
//! way the endpoint table does.

mod catalog;
mod daily_reports;
mod dashboard;
mod forages;
mod indicateurs;
mod operations;
mod phases;
mod problemes;
mod puits;
mod utilisateurs;

pub use catalog::CatalogService;
pub use daily_reports::DailyReportService;
pub use dashboard::DashboardService;
pub use forages::ForageService;
pub use indicateurs::IndicateurService;
pub use operations::OperationService;
pub use phases::PhaseService;
pub use problemes::ProblemeService;
pub use puits::PuitService;
pub use utilisateurs::UtilisateurService;

use super::client::ForageClient;

impl ForageClient {
    pub fn puits(&self) -> PuitService<'_> {
        PuitService { client: self }
    }

    pub fn forages(&self) -> ForageService<'_> {
        ForageService { client: self }
    }

    pub fn phases(&self) -> PhaseService<'_> {
        PhaseService { client: self }
    }

    pub fn operations(&self) -> OperationService<'_> {
        OperationService { client: self }
    }

    pub fn catalog(&self) -> CatalogService<'_> {
        CatalogService { client: self }
    }

    pub fn indicateurs(&self) -> IndicateurService<'_> {
        IndicateurService { client: self }
    }

    pub fn daily_reports(&self) -> DailyReportService<'_> {
        DailyReportService { client: self }
    }

    pub fn problemes(&self) -> ProblemeService<'_> {
        ProblemeService { client: self }
    }

    pub fn utilisateurs(&self) -> UtilisateurService<'_> {
        UtilisateurService { client: self }
    }

    pub fn dashboard(&self) -> DashboardService<'_> {
        DashboardService { client: self }
    }
}
