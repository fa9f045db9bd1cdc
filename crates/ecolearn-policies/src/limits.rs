// SPDX-License-Identifier: Apache-2.0

pub const DEFAULT_ELECTRICITY_KG_PER_KWH: f64 = 0.82;
pub const DEFAULT_LPG_KG_PER_KG: f64 = 2.98;
pub const DEFAULT_WASTE_KG_PER_KG: f64 = 1.90;

pub const LOG_TEXT_MIN_CHARS: usize = 3;
pub const LOG_TEXT_MAX_CHARS: usize = 1000;

pub const MAX_TIPS: usize = 3;
pub const MAX_WORDS_PER_COACHING_STRING: usize = 28;
