use crate::{FRONTEND_MARKUP, FRONTEND_SCRIPT};
use codestrip_types::rule::{ArtifactKind, RegionEnd, Rule, RuleKind, RuleSet};

pub fn frontend_script() -> RuleSet {
    RuleSet::new(
        FRONTEND_SCRIPT,
        ArtifactKind::Script,
        vec![
            Rule::new(
                "stripe-js-import",
                "Drop the browser payment SDK import.",
                RuleKind::StripDeclaration {
                    module: "@stripe/stripe-js".to_string(),
                },
            ),
            Rule::new(
                "payment-client-import",
                "Drop the client-side payment service import.",
                RuleKind::StripDeclaration {
                    module: "./services/paymentClient.js".to_string(),
                },
            ),
            Rule::new(
                "subscription-loaded-flag",
                "Treat subscription state as already loaded so the UI never waits on it.",
                RuleKind::ReplaceLiteral {
                    find: "let subscriptionLoaded = false;".to_string(),
                    replace: "let subscriptionLoaded = true; // subscriptions removed".to_string(),
                },
            ),
            Rule::new(
                "premium-flag",
                "Unlock every feature by default.",
                RuleKind::ReplaceLiteral {
                    find: "let isPremiumUser = false;".to_string(),
                    replace: "let isPremiumUser = true; // all features unlocked".to_string(),
                },
            ),
            Rule::new(
                "premium-gate",
                "Remove upgrade gates, including their else branches.",
                RuleKind::DeleteRegion {
                    start: "if (!isPremiumUser)".to_string(),
                    end: RegionEnd::Block,
                },
            ),
            Rule::new(
                "check-subscription",
                "Report every user as active without calling the billing API.",
                RuleKind::ReplaceFunctionBody {
                    signature: "async function checkSubscriptionStatus".to_string(),
                    body: "{\n  return { active: true, plan: 'free' };\n}".to_string(),
                },
            ),
            Rule::new(
                "upgrade-modal",
                "Never show the upgrade modal.",
                RuleKind::ReplaceFunctionBody {
                    signature: "function showUpgradeModal".to_string(),
                    body: "{\n  return;\n}".to_string(),
                },
            ),
            Rule::new(
                "start-checkout",
                "Send checkout attempts back to the dashboard.",
                RuleKind::ReplaceFunctionBody {
                    signature: "async function startCheckout".to_string(),
                    body: "{\n  window.location.href = '/';\n}".to_string(),
                },
            ),
            Rule::new(
                "payment-client-calls",
                "Remove remaining calls into the payment client.",
                RuleKind::StripStatement {
                    prefix: "paymentClient.".to_string(),
                },
            ),
        ],
    )
    .with_description("Client bundle: payment SDK, subscription gates and checkout flow.")
}

pub fn frontend_markup() -> RuleSet {
    RuleSet::new(
        FRONTEND_MARKUP,
        ArtifactKind::Markup,
        vec![
            Rule::new(
                "payment-section",
                "Remove pricing and checkout markup between the payment markers.",
                RuleKind::DeleteRegion {
                    start: "<!-- PAYMENT-START -->".to_string(),
                    end: RegionEnd::Marker("<!-- PAYMENT-END -->".to_string()),
                },
            ),
            Rule::new(
                "stripe-script-tag",
                "Stop loading the hosted payment SDK.",
                RuleKind::DeleteRegion {
                    start: "<script src=\"https://js.stripe.com/v3/\">".to_string(),
                    end: RegionEnd::Marker("</script>".to_string()),
                },
            ),
        ],
    )
    .with_description("Page markup: pricing section and payment SDK script tag.")
}
