//! Real Tuscany locations for realistic test fixtures.
//!
//! Coordinates taken from OpenStreetMap.

#![allow(dead_code)]

/// A named place with coordinates.
#[derive(Debug, Clone)]
pub struct Place {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Place {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }
}

pub const MILAN: Place = Place::new("Milano Centrale", 45.4862, 9.2042);

// ============================================================================
// Overnight stays
// ============================================================================

pub const HOTELS: &[Place] = &[
    Place::new("Hotel Brunelleschi", 43.7719, 11.2553),
    Place::new("Grand Hotel Continental Siena", 43.3195, 11.3300),
    Place::new("Hotel Bologna Pisa", 43.7137, 10.3967),
];

// ============================================================================
// Florence (all within a few km of each other)
// ============================================================================

pub const FLORENCE_SIGHTS: &[Place] = &[
    Place::new("Galleria degli Uffizi", 43.7678, 11.2553),
    Place::new("Cattedrale di Santa Maria del Fiore", 43.7731, 11.2560),
    Place::new("Ponte Vecchio", 43.7680, 11.2531),
    Place::new("Palazzo Pitti", 43.7652, 11.2500),
    Place::new("Galleria dell'Accademia", 43.7768, 11.2586),
    Place::new("Piazzale Michelangelo", 43.7629, 11.2650),
];

pub const FLORENCE_CAFES: &[Place] = &[
    Place::new("Caffe Gilli", 43.7717, 11.2541),
    Place::new("Giardino di Boboli", 43.7625, 11.2486),
];

// ============================================================================
// Elsewhere in Tuscany (more than 20 km from Florence and each other)
// ============================================================================

pub const SIENA: Place = Place::new("Piazza del Campo", 43.3184, 11.3316);
pub const PISA: Place = Place::new("Torre di Pisa", 43.7230, 10.3966);
pub const SAN_GIMIGNANO: Place = Place::new("San Gimignano", 43.4677, 11.0432);
pub const LUCCA: Place = Place::new("Mura di Lucca", 43.8430, 10.5050);
pub const MONTEPULCIANO: Place = Place::new("Montepulciano", 43.0926, 11.7807);
