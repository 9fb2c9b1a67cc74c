//! Zoom Phone calling plan type codes

/// Calling plan type code and name, ordered by code
pub type CallingPlanTable = &'static [(i64, &'static str)];

pub const CALLING_PLANS: CallingPlanTable = &[
    (1, "NO_FEATURE_PACKAGE"),
    (3, "INTERNATIONAL_TOLL_NUMBER"),
    (4, "INTERNATIONAL_TOLL_FREE_NUMBER"),
    (5, "BYOC_NUMBER"),
    (6, "BETA_NUMBER"),
    (100, "METERED_PLAN_US_CA"),
    (101, "METERED_PLAN_AU_NZ"),
    (102, "METERED_PLAN_GB_IE"),
    (103, "METERED_EURA"),
    (104, "METERED_EURB"),
    (107, "METERED_JP"),
    (200, "UNLIMITED_PLAN_US_CA"),
    (201, "UNLIMITED_PLAN_AU_NZ"),
    (202, "UNLIMITED_PLAN_GB_IE"),
    (203, "UNLIMITED_EURA"),
    (204, "UNLIMITED_EURB"),
    (207, "UNLIMITED_JP"),
    (300, "US_CA_NUMBER"),
    (301, "AU_NZ_NUMBER"),
    (302, "GB_IE_NUMBER"),
    (303, "EURA_NUMBER"),
    (304, "EURB_NUMBER"),
    (307, "JP_NUMBER"),
    (400, "US_CA_TOLLFREE_NUMBER"),
    (401, "AU_TOLLFREE_NUMBER"),
    (402, "GB_IE_TOLLFREE_NUMBER"),
    (403, "NZ_TOLLFREE_NUMBER"),
    (404, "GLOBAL_TOLLFREE_NUMBER"),
    (600, "BETA"),
    (1000, "UNLIMITED_DOMESTIC_SELECT"),
    (1001, "METERED_GLOBAL_SELECT"),
    (2000, "UNLIMITED_DOMESTIC_SELECT_NUMBER"),
    (3000, "ZP_PRO"),
    (3010, "BASIC"),
    (3040, "ZP_COMMON_AREA"),
    (3098, "RESERVED_PLAN"),
    (3099, "BASIC_MIGRATED"),
    (4000, "INTERNATIONAL_SELECT_ADDON"),
    (4010, "ZP_PREMIUM_ADDON"),
    (5000, "PREMIUM_NUMBER"),
    (30000, "METERED_US_CA_NUMBER_INCLUDED"),
    (30001, "METERED_AU_NZ_NUMBER_INCLUDED"),
    (30002, "METERED_GB_IE_NUMBER_INCLUDED"),
    (30003, "METERED_EURA_NUMBER_INCLUDED"),
    (30004, "METERED_EURB_NUMBER_INCLUDED"),
    (30007, "METERED_JP_NUMBER_INCLUDED"),
    (31000, "UNLIMITED_US_CA_NUMBER_INCLUDED"),
    (31001, "UNLIMITED_AU_NZ_NUMBER_INCLUDED"),
    (31002, "UNLIMITED_GB_IE_NUMBER_INCLUDED"),
    (31003, "UNLIMITED_EURA_NUMBER_INCLUDED"),
    (31004, "UNLIMITED_EURB_NUMBER_INCLUDED"),
    (31005, "UNLIMITED_DOMESTIC_SELECT_NUMBER_INCLUDED"),
    (31006, "METERED_GLOBAL_SELECT_NUMBER_INCLUDED"),
    (31007, "UNLIMITED_JP_NUMBER_INCLUDED"),
    (40200, "MEETINGS_PRO_UNLIMITED_US_CA"),
    (40201, "MEETINGS_PRO_UNLIMITED_AU_NZ"),
    (40202, "MEETINGS_PRO_UNLIMITED_GB_IE"),
    (40207, "MEETINGS_PRO_UNLIMITED_JP"),
    (41000, "MEETINGS_PRO_GLOBAL_SELECT"),
    (43000, "MEETINGS_PRO_PN_PRO"),
    (50200, "MEETINGS_BUS_UNLIMITED_US_CA"),
    (50201, "MEETINGS_BUS_UNLIMITED_AU_NZ"),
    (50202, "MEETINGS_BUS_UNLIMITED_GB_IE"),
    (50207, "MEETINGS_BUS_UNLIMITED_JP"),
    (51000, "MEETINGS_BUS_GLOBAL_SELECT"),
    (53000, "MEETINGS_BUS_PN_PRO"),
    (60200, "MEETINGS_ENT_UNLIMITED_US_CA"),
    (60201, "MEETINGS_ENT_UNLIMITED_AU_NZ"),
    (60202, "MEETINGS_ENT_UNLIMITED_GB_IE"),
    (60207, "MEETINGS_ENT_UNLIMITED_JP"),
    (61000, "MEETINGS_ENT_GLOBAL_SELECT"),
    (63000, "MEETINGS_ENT_PN_PRO"),
    (70200, "MEETINGS_US_CA_NUMBER_INCLUDED"),
    (70201, "MEETINGS_AU_NZ_NUMBER_INCLUDED"),
    (70202, "MEETINGS_GB_IE_NUMBER_INCLUDED"),
    (70207, "MEETINGS_JP_NUMBER_INCLUDED"),
    (71000, "MEETINGS_GLOBAL_SELECT_NUMBER_INCLUDED"),
    (83000, "ZOOM_WORKPLACE_ENTERPRISE"),
];

/// Name for a calling plan type code
pub fn name_of(table: CallingPlanTable, plan_type: i64) -> Option<&'static str> {
    table
        .binary_search_by_key(&plan_type, |(code, _)| *code)
        .ok()
        .map(|i| table[i].1)
}

pub fn is_known(table: CallingPlanTable, plan_type: i64) -> bool {
    name_of(table, plan_type).is_some()
}

pub fn codes(table: CallingPlanTable) -> impl Iterator<Item = i64> {
    table.iter().map(|(code, _)| *code)
}
