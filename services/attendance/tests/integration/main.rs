
mod otp_test;
mod router_test;
mod routing_test;
