//! One canned line per action and tier.

use vr_rules::{ActionType, Tier};

/// The commentary line for an action and tier.
pub fn commentary(action: ActionType, tier: Tier) -> &'static str {
    use ActionType as A;
    use Tier as T;

    match (action, tier) {
        (A::Mining, T::CriticalSuccess) => "The drill bites into a vein richer than any survey predicted.",
        (A::Mining, T::Success) => "Clean cuts, steady yield. The hold fills nicely.",
        (A::Mining, T::Partial) => "Some ore comes loose, but the rock fights back.",
        (A::Mining, T::Failure) => "The asteroid gives up nothing but dust.",
        (A::Mining, T::CriticalFailure) => "The drill shrieks and the rock face shears away.",

        (A::Scavenging, T::CriticalSuccess) => "Someone left the good stuff behind. Their loss.",
        (A::Scavenging, T::Success) => "The wreck yields its salvage without complaint.",
        (A::Scavenging, T::Partial) => "A few usable parts, pried loose the hard way.",
        (A::Scavenging, T::Failure) => "Nothing in the debris worth the fuel.",
        (A::Scavenging, T::CriticalFailure) => "Something in the wreck was still armed.",

        (A::Derelict, T::CriticalSuccess) => "The derelict's secrets open up like a map.",
        (A::Derelict, T::Success) => "The boarding party finds what the crew left behind.",
        (A::Derelict, T::Partial) => "Dark corridors and half-answers.",
        (A::Derelict, T::Failure) => "The derelict keeps its secrets.",
        (A::Derelict, T::CriticalFailure) => "Lights flicker on in the derelict. You are not alone.",

        (A::AwayTeam, T::CriticalSuccess) => "The away team returns with more than they went for.",
        (A::AwayTeam, T::Success) => "The surface survey goes by the book.",
        (A::AwayTeam, T::Partial) => "The team makes it back, scraped and winded.",
        (A::AwayTeam, T::Failure) => "The landing goes wrong from the first step.",
        (A::AwayTeam, T::CriticalFailure) => "The shuttle lifts off one voice quieter.",

        (A::Combat, T::CriticalSuccess) => "A perfect firing solution. The hit lands square.",
        (A::Combat, T::Success) => "Shots connect across the hostile's hull.",
        (A::Combat, T::Partial) => "Close, but the volley goes wide.",
        (A::Combat, T::Failure) => "The hostile slips out of the firing arc.",
        (A::Combat, T::CriticalFailure) => "The weapon coughs and locks up.",

        (A::Flee, T::CriticalSuccess) => "Engines flare and the pursuer is a fading dot.",
        (A::Flee, T::Success) => "You break contact and burn for open space.",
        (A::Flee, T::Partial) => "Distance opens, slowly.",
        (A::Flee, T::Failure) => "The pursuer matches every burn.",
        (A::Flee, T::CriticalFailure) => "The engines stall mid-burn with the hostile closing.",

        (A::Repair, T::CriticalSuccess) => "The repair crew leaves the hull better than new.",
        (A::Repair, T::Success) => "Patches hold and the hull stops groaning.",
        (A::Repair, T::Partial) => "A stopgap fix. It will do for now.",
        (A::Repair, T::Failure) => "The breach will not seal.",
        (A::Repair, T::CriticalFailure) => "A coupling snaps and the bay fills with sparks.",

        (A::Mission, T::CriticalSuccess) => "The client is delighted and pays a premium.",
        (A::Mission, T::Success) => "Job done, payment received.",
        (A::Mission, T::Partial) => "The client pays, with a frown.",
        (A::Mission, T::Failure) => "The client docks your fee.",
        (A::Mission, T::CriticalFailure) => "The deal collapses and you leave with nothing.",
    }
}
