//! The seed catalog loaded at start-up.
//!
//! State is process-lifetime only: a restart resets every tier back to the
//! values below.

use std::collections::BTreeMap;

use crate::{Event, EventId, TicketStock, TicketTier};

struct Seed {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    date: &'static str,
    location: &'static str,
    regular: (u64, u32),
    vip: (u64, u32),
}

const SEEDS: [Seed; 5] = [
    Seed {
        id: "ev1",
        name: "Senja Fest",
        description: "Konser band indie paling hits tahun ini.",
        date: "Besok, 16:00 WIB",
        location: "Parkir Timur Senayan",
        regular: (50_000, 100),
        vip: (150_000, 5),
    },
    Seed {
        id: "ev2",
        name: "Indie Movie Night",
        description: "Pemutaran film pendek karya anak bangsa.",
        date: "Sabtu, 19:00 WIB",
        location: "Taman Ismail Marzuki",
        regular: (25_000, 200),
        vip: (75_000, 20),
    },
    Seed {
        id: "ev3",
        name: "Jazz Gunung",
        description: "Menikmati musik jazz di ketinggian 2000mdpl.",
        date: "Minggu, 15:00 WIB",
        location: "Bromo Amphitheater",
        regular: (250_000, 150),
        vip: (500_000, 10),
    },
    Seed {
        id: "ev4",
        name: "Horror Marathon",
        description: "Nonton bareng 3 film horor klasik Indonesia.",
        date: "Jumat Malam, 21:00 WIB",
        location: "CGV Drive-In",
        regular: (40_000, 80),
        vip: (100_000, 15),
    },
    Seed {
        id: "ev5",
        name: "Tech Conference 2024",
        description: "Seminar teknologi terbesar di Asia Tenggara.",
        date: "Senin, 09:00 WIB",
        location: "ICE BSD City",
        regular: (75_000, 500),
        vip: (250_000, 50),
    },
];

/// The built-in catalog, ordered by event ID.
#[must_use]
pub fn seed_catalog() -> Vec<Event> {
    SEEDS
        .iter()
        .map(|seed| Event {
            id: EventId::new(seed.id),
            name: seed.name.to_string(),
            description: seed.description.to_string(),
            date: seed.date.to_string(),
            location: seed.location.to_string(),
            tickets: BTreeMap::from([
                (
                    TicketTier::Regular,
                    TicketStock::new(seed.regular.0, seed.regular.1),
                ),
                (TicketTier::Vip, TicketStock::new(seed.vip.0, seed.vip.1)),
            ]),
        })
        .collect()
}
