mod mul;
